//! Membership domain models
//!
//! A membership links one user to one organization with a role. A user belongs
//! to at most one organization at a time; the stores enforce that by keying
//! memberships on the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::id::EntityId;

use crate::organization::Organization;
use crate::roles::OrganizationRole;

/// Organization membership linking a user to an organization.
///
/// # Examples
///
/// ```
/// use docshare_org::{EntityId, OrganizationMembership, OrganizationRole};
///
/// let org_id = EntityId::generate();
/// let user_id = EntityId::generate();
/// let membership = OrganizationMembership::new(org_id, user_id, OrganizationRole::Member);
/// assert_eq!(membership.role, OrganizationRole::Member);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrganizationMembership {
    /// Organization ID
    pub organization_id: EntityId,

    /// User ID
    pub user_id: EntityId,

    /// Role within the organization
    pub role: OrganizationRole,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Who invited this user (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<EntityId>,

    /// Invitation consumed to create this membership (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<EntityId>,
}

impl OrganizationMembership {
    /// Creates a new organization membership joined now.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `user_id` - The user ID
    /// * `role` - The user's role in the organization
    pub fn new(organization_id: EntityId, user_id: EntityId, role: OrganizationRole) -> Self {
        Self {
            organization_id,
            user_id,
            role,
            joined_at: Utc::now(),
            invited_by: None,
            invitation_id: None,
        }
    }

    /// The creator's membership for a freshly created organization.
    pub fn creator(organization: &Organization) -> Self {
        Self::new(
            organization.id,
            organization.created_by_id(),
            OrganizationRole::Admin,
        )
    }

    /// Record the invitation this membership came from.
    ///
    /// # Arguments
    ///
    /// * `invitation_id` - The consumed invitation
    /// * `inviter_id` - The user who issued it
    pub fn with_invitation(mut self, invitation_id: EntityId, inviter_id: EntityId) -> Self {
        self.invitation_id = Some(invitation_id);
        self.invited_by = Some(inviter_id);
        self
    }

    /// Check if this membership carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A member row as shown in member listings.
///
/// Combines the membership with the user's profile fields so a listing can be
/// searched and rendered without another lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberSummary {
    /// User ID
    pub user_id: EntityId,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Full name, if set
    #[serde(default)]
    pub full_name: Option<String>,

    /// Role within the organization
    pub role: OrganizationRole,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Whether this member created the organization
    #[serde(default)]
    pub is_creator: bool,
}

impl MemberSummary {
    /// Case-insensitive match of `query` against username, email and full name.
    ///
    /// An empty or whitespace-only query matches every member.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.username.to_lowercase().contains(&query)
            || self.email.to_lowercase().contains(&query)
            || self
                .full_name
                .as_ref()
                .map(|n| n.to_lowercase().contains(&query))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> MemberSummary {
        MemberSummary {
            user_id: EntityId::generate(),
            username: "bwayne".to_string(),
            email: "bruce@example.com".to_string(),
            full_name: Some("Bruce Wayne".to_string()),
            role: OrganizationRole::Member,
            joined_at: Utc::now(),
            is_creator: false,
        }
    }

    #[test]
    fn test_organization_membership_creation() {
        let org_id = EntityId::generate();
        let user_id = EntityId::generate();
        let membership = OrganizationMembership::new(org_id, user_id, OrganizationRole::Member);

        assert_eq!(membership.organization_id, org_id);
        assert_eq!(membership.user_id, user_id);
        assert!(!membership.is_admin());
        assert!(membership.invited_by.is_none());
    }

    #[test]
    fn test_creator_membership_is_admin() {
        let creator = EntityId::generate();
        let org = Organization::new("Acme", creator);
        let membership = OrganizationMembership::creator(&org);

        assert_eq!(membership.user_id, creator);
        assert_eq!(membership.organization_id, org.id);
        assert_eq!(membership.role, OrganizationRole::Admin);
    }

    #[test]
    fn test_membership_with_invitation() {
        let invitation_id = EntityId::generate();
        let inviter = EntityId::generate();
        let membership =
            OrganizationMembership::new(EntityId::generate(), EntityId::generate(), OrganizationRole::Member)
                .with_invitation(invitation_id, inviter);

        assert_eq!(membership.invitation_id, Some(invitation_id));
        assert_eq!(membership.invited_by, Some(inviter));
    }

    #[test]
    fn test_member_summary_search() {
        let member = summary();
        assert!(member.matches(""));
        assert!(member.matches("BWAY"));
        assert!(member.matches("example.com"));
        assert!(member.matches("wayne"));
        assert!(!member.matches("clark"));
    }

    #[test]
    fn test_member_summary_search_without_full_name() {
        let mut member = summary();
        member.full_name = None;
        assert!(!member.matches("Bruce Wayne"));
        assert!(member.matches("bruce@"));
    }
}
