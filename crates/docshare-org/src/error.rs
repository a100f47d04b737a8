//! Error types for organization, membership and invitation operations
//!
//! Every lifecycle failure is a distinct variant so callers can render a
//! specific message and decide whether the failure is final.

use thiserror::Error;
use crate::id::EntityId;

/// Organization error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrgError {
    /// The actor is not allowed to perform the action
    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    /// The invite code is malformed or matches no usable invitation
    #[error("Invalid invite code")]
    InvalidCode,

    /// The invitation's expiry time has passed
    #[error("Invitation has expired")]
    Expired,

    /// The invitation has been used `max_uses` times
    #[error("Invitation usage limit reached")]
    UsageLimitReached,

    /// The actor already belongs to an organization
    #[error("User already belongs to an organization")]
    AlreadyInOrganization,

    /// The actor's email address is not verified
    #[error("Email verification required")]
    NotVerified,

    /// The email address failed syntax checks
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Resend was requested for a code invitation
    #[error("Only email invitations can be resent")]
    NotEmailType,

    /// The invitation has been revoked
    #[error("Invitation is no longer active")]
    Inactive,

    /// The requested expiry time is not in the future
    #[error("Expiry time must be in the future")]
    InvalidExpiry,

    /// The requested usage limit is below one
    #[error("Maximum uses must be at least 1")]
    InvalidMaxUses,

    /// Page size outside the allowed set
    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),

    /// Unknown role name
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Organization name is blank or too long
    #[error("Invalid organization name")]
    InvalidName,

    /// The invitation email could not be handed off for delivery
    #[error("Invitation delivery failed: {0}")]
    DeliveryFailed(String),

    /// Organization does not exist
    #[error("Organization not found: {0}")]
    OrganizationNotFound(EntityId),

    /// User is not a member of the organization
    #[error("Member not found: {0}")]
    MemberNotFound(EntityId),

    /// Invitation does not exist in the organization
    #[error("Invitation not found: {0}")]
    InvitationNotFound(EntityId),

    /// User account does not exist
    #[error("User not found: {0}")]
    UserNotFound(EntityId),

    /// Unexpected failure in the system of record
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for organization operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, OrgError::Internal(_) | OrgError::DeliveryFailed(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::Forbidden | OrgError::NotVerified => 403,

            OrgError::InvalidCode
            | OrgError::OrganizationNotFound(_)
            | OrgError::MemberNotFound(_)
            | OrgError::InvitationNotFound(_)
            | OrgError::UserNotFound(_) => 404,

            OrgError::Expired => 410,

            OrgError::UsageLimitReached | OrgError::AlreadyInOrganization => 409,

            OrgError::NotEmailType | OrgError::Inactive => 400,

            OrgError::InvalidEmail(_)
            | OrgError::InvalidExpiry
            | OrgError::InvalidMaxUses
            | OrgError::InvalidPageSize(_)
            | OrgError::InvalidRole(_)
            | OrgError::InvalidName => 422,

            OrgError::DeliveryFailed(_) => 502,
            OrgError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::Forbidden => "FORBIDDEN",
            OrgError::InvalidCode => "INVALID_CODE",
            OrgError::Expired => "EXPIRED",
            OrgError::UsageLimitReached => "USAGE_LIMIT_REACHED",
            OrgError::AlreadyInOrganization => "ALREADY_IN_ORGANIZATION",
            OrgError::NotVerified => "NOT_VERIFIED",
            OrgError::InvalidEmail(_) => "INVALID_EMAIL",
            OrgError::NotEmailType => "NOT_EMAIL_TYPE",
            OrgError::Inactive => "INACTIVE",
            OrgError::InvalidExpiry => "INVALID_EXPIRY",
            OrgError::InvalidMaxUses => "INVALID_MAX_USES",
            OrgError::InvalidPageSize(_) => "INVALID_PAGE_SIZE",
            OrgError::InvalidRole(_) => "INVALID_ROLE",
            OrgError::InvalidName => "INVALID_NAME",
            OrgError::DeliveryFailed(_) => "DELIVERY_FAILED",
            OrgError::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            OrgError::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            OrgError::InvitationNotFound(_) => "INVITATION_NOT_FOUND",
            OrgError::UserNotFound(_) => "USER_NOT_FOUND",
            OrgError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            OrgError::Forbidden => {
                "You don't have permission to do that in this organization.".to_string()
            }
            OrgError::InvalidCode => {
                "That invite code isn't valid. Check the code or ask for a new invite.".to_string()
            }
            OrgError::Expired => {
                "This invitation has expired. Ask an organization admin for a new one.".to_string()
            }
            OrgError::UsageLimitReached => {
                "This invitation has already been used the maximum number of times.".to_string()
            }
            OrgError::AlreadyInOrganization => {
                "You already belong to an organization. Leave it before joining another."
                    .to_string()
            }
            OrgError::NotVerified => {
                "Please verify your email address before continuing.".to_string()
            }
            OrgError::InvalidEmail(email) => {
                format!("\"{}\" is not a valid email address.", email)
            }
            OrgError::NotEmailType => {
                "Only email invitations can be resent. Share the code link instead.".to_string()
            }
            OrgError::Inactive => {
                "This invitation has been revoked and can no longer be used.".to_string()
            }
            OrgError::InvalidExpiry => "Choose an expiry date in the future.".to_string(),
            OrgError::InvalidMaxUses => "Maximum uses must be at least 1.".to_string(),
            OrgError::InvalidPageSize(size) => {
                format!("{} is not a supported page size (use 5, 10, 25 or 50).", size)
            }
            OrgError::InvalidRole(role) => {
                format!("\"{}\" is not a role. Use admin or member.", role)
            }
            OrgError::InvalidName => {
                "Organization names must be between 1 and 100 characters.".to_string()
            }
            OrgError::DeliveryFailed(_) => {
                "The invitation was saved but the email could not be sent. Try resending it."
                    .to_string()
            }
            OrgError::OrganizationNotFound(_) => "That organization no longer exists.".to_string(),
            OrgError::MemberNotFound(_) => {
                "That user is not a member of this organization.".to_string()
            }
            OrgError::InvitationNotFound(_) => "That invitation could not be found.".to_string(),
            OrgError::UserNotFound(_) => "That user could not be found.".to_string(),
            OrgError::Internal(_) => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(OrgError::Forbidden.status_code(), 403);
        assert_eq!(OrgError::NotVerified.status_code(), 403);
        assert_eq!(OrgError::InvalidCode.status_code(), 404);
        assert_eq!(OrgError::Expired.status_code(), 410);
        assert_eq!(OrgError::UsageLimitReached.status_code(), 409);
        assert_eq!(OrgError::InvalidEmail("x".into()).status_code(), 422);
        assert_eq!(OrgError::Internal("db".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            OrgError::Forbidden,
            OrgError::InvalidCode,
            OrgError::Expired,
            OrgError::UsageLimitReached,
            OrgError::AlreadyInOrganization,
            OrgError::NotVerified,
            OrgError::InvalidEmail(String::new()),
            OrgError::NotEmailType,
            OrgError::Inactive,
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.error_code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_user_messages_are_specific() {
        assert!(OrgError::InvalidEmail("nope".into()).user_message().contains("nope"));
        assert!(OrgError::Expired.user_message().contains("expired"));
        assert_ne!(
            OrgError::Inactive.user_message(),
            OrgError::Internal(String::new()).user_message()
        );
    }

    #[test]
    fn test_server_errors() {
        assert!(OrgError::Internal("x".into()).is_server_error());
        assert!(!OrgError::Forbidden.is_server_error());
    }
}
