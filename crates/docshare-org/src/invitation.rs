//! Invitation domain models
//!
//! An invitation grants entry into one organization. It is either a shareable
//! code (`InviteType::Code`) or bound to one email address
//! (`InviteType::Email`); both carry an [`InviteCode`].
//!
//! # Status
//!
//! The status is never stored. It is derived from the fields on every read,
//! in this order:
//!
//! ```text
//! !is_active                          -> Revoked
//! expires_at <= now                   -> Expired
//! max_uses set, used_count >= max     -> UsedUp
//! used_count == 0                     -> Pending
//! otherwise                           -> Active
//! ```
//!
//! # Transitions
//!
//! Invitations are never deleted. They change only through consumption
//! (`used_count + 1`, never past `max_uses`), revocation (`is_active = false`,
//! terminal) and resend (no field change).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use crate::id::EntityId;
use validator::ValidateEmail;

use crate::error::{OrgError, OrgResult};
use crate::invite_code::InviteCode;

/// How close to expiry an invitation counts as "expiring soon".
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 2;

/// Kind of invitation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InviteType {
    /// Shareable code or link
    Code,

    /// Sent to one email address
    Email,
}

impl InviteType {
    /// Get string representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteType::Code => "code",
            InviteType::Email => "email",
        }
    }

    /// Parse from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "code" => Some(InviteType::Code),
            "email" => Some(InviteType::Email),
            _ => None,
        }
    }
}

/// Derived invitation status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Usable, never used
    Pending,

    /// Usable, used at least once
    Active,

    /// Expiry time has passed
    Expired,

    /// Usage limit reached
    UsedUp,

    /// Revoked by an admin
    Revoked,
}

impl InvitationStatus {
    /// Whether an invitation in this status can still be consumed.
    pub fn is_usable(&self) -> bool {
        matches!(self, InvitationStatus::Pending | InvitationStatus::Active)
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Active => "active",
            InvitationStatus::Expired => "expired",
            InvitationStatus::UsedUp => "used_up",
            InvitationStatus::Revoked => "revoked",
        }
    }
}

/// Options for issuing an invitation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteOptions {
    /// When the invitation stops working
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// How many times it may be used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
}

impl InviteOptions {
    /// Expire at a fixed time.
    pub fn expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Expire after `duration` from `now`.
    pub fn expires_in(self, now: DateTime<Utc>, duration: Duration) -> Self {
        self.expires_at(now + duration)
    }

    /// Limit the number of uses.
    pub fn max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    /// Check that the expiry is in the future and the usage limit is positive.
    pub fn validate(&self, now: DateTime<Utc>) -> OrgResult<()> {
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return Err(OrgError::InvalidExpiry);
            }
        }
        if let Some(max_uses) = self.max_uses {
            if max_uses < 1 {
                return Err(OrgError::InvalidMaxUses);
            }
        }
        Ok(())
    }
}

/// Filters for invitation listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteFilter {
    /// Only invitations that can still be used (pending or active)
    #[serde(default)]
    pub active_only: bool,

    /// Only invitations of this type
    #[serde(default)]
    pub invite_type: Option<InviteType>,
}

impl InviteFilter {
    /// Keep only usable invitations.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Keep only invitations of `invite_type`.
    pub fn of_type(mut self, invite_type: InviteType) -> Self {
        self.invite_type = Some(invite_type);
        self
    }

    /// Whether `invitation` passes the filter at `now`.
    pub fn accepts(&self, invitation: &Invitation, now: DateTime<Utc>) -> bool {
        if self.active_only && !invitation.status_at(now).is_usable() {
            return false;
        }
        self.invite_type
            .map(|t| invitation.invite_type == t)
            .unwrap_or(true)
    }
}

/// An invitation into an organization.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use docshare_org::{EntityId, Invitation, InvitationStatus, InviteOptions};
///
/// let mut invite = Invitation::code(
///     EntityId::generate(),
///     EntityId::generate(),
///     InviteOptions::default().max_uses(1),
/// );
/// let now = Utc::now();
/// assert_eq!(invite.status_at(now), InvitationStatus::Pending);
///
/// invite.consume(now).unwrap();
/// assert_eq!(invite.status_at(now), InvitationStatus::UsedUp);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invitation {
    /// Unique invitation ID
    pub id: EntityId,

    /// Organization the invitation grants entry to
    pub organization_id: EntityId,

    /// Code or email invitation
    pub invite_type: InviteType,

    /// The opaque token
    pub invite_code: InviteCode,

    /// Recipient, present only for email invitations
    #[serde(default)]
    pub email: Option<String>,

    /// When the invitation stops working
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Usage limit
    #[serde(default)]
    pub max_uses: Option<u32>,

    /// Times the invitation has been consumed
    #[serde(default)]
    pub used_count: u32,

    /// False once revoked
    pub is_active: bool,

    /// Who issued the invitation
    pub created_by_id: EntityId,

    /// When it was issued
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Issue a code invitation with a freshly generated code.
    pub fn code(organization_id: EntityId, created_by_id: EntityId, options: InviteOptions) -> Self {
        Self::build(
            organization_id,
            created_by_id,
            InviteType::Code,
            None,
            options,
        )
    }

    /// Issue an email invitation.
    ///
    /// The address is expected to be validated with [`validate_email`] first.
    pub fn email(
        organization_id: EntityId,
        created_by_id: EntityId,
        email: impl Into<String>,
        options: InviteOptions,
    ) -> Self {
        Self::build(
            organization_id,
            created_by_id,
            InviteType::Email,
            Some(email.into()),
            options,
        )
    }

    fn build(
        organization_id: EntityId,
        created_by_id: EntityId,
        invite_type: InviteType,
        email: Option<String>,
        options: InviteOptions,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            organization_id,
            invite_type,
            invite_code: InviteCode::generate(),
            email,
            expires_at: options.expires_at,
            max_uses: options.max_uses,
            used_count: 0,
            is_active: true,
            created_by_id,
            created_at: Utc::now(),
        }
    }

    /// Derive the status at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> InvitationStatus {
        if !self.is_active {
            InvitationStatus::Revoked
        } else if self.expires_at.map(|at| at <= now).unwrap_or(false) {
            InvitationStatus::Expired
        } else if self
            .max_uses
            .map(|max| self.used_count >= max)
            .unwrap_or(false)
        {
            InvitationStatus::UsedUp
        } else if self.used_count == 0 {
            InvitationStatus::Pending
        } else {
            InvitationStatus::Active
        }
    }

    /// Derive the status now.
    pub fn status(&self) -> InvitationStatus {
        self.status_at(Utc::now())
    }

    /// Uses left before the limit, `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|max| max.saturating_sub(self.used_count))
    }

    /// Check that the invitation can be consumed at `now`.
    ///
    /// A revoked invitation is reported as [`OrgError::InvalidCode`]: from the
    /// joining user's side it is indistinguishable from an unknown code.
    pub fn check_joinable(&self, now: DateTime<Utc>) -> OrgResult<()> {
        match self.status_at(now) {
            InvitationStatus::Pending | InvitationStatus::Active => Ok(()),
            InvitationStatus::Revoked => Err(OrgError::InvalidCode),
            InvitationStatus::Expired => Err(OrgError::Expired),
            InvitationStatus::UsedUp => Err(OrgError::UsageLimitReached),
        }
    }

    /// Record one use.
    ///
    /// Fails without modifying anything unless the invitation is usable at
    /// `now`, so `used_count` never exceeds `max_uses`.
    pub fn consume(&mut self, now: DateTime<Utc>) -> OrgResult<()> {
        self.check_joinable(now)?;
        self.used_count += 1;
        Ok(())
    }

    /// Revoke the invitation.
    ///
    /// # Returns
    ///
    /// `true` if this call changed the invitation, `false` if it was already
    /// revoked
    pub fn revoke(&mut self) -> bool {
        let changed = self.is_active;
        self.is_active = false;
        changed
    }

    /// Check that the invitation email may be delivered again.
    pub fn check_resendable(&self) -> OrgResult<()> {
        if self.invite_type != InviteType::Email {
            return Err(OrgError::NotEmailType);
        }
        if !self.is_active {
            return Err(OrgError::Inactive);
        }
        Ok(())
    }

    /// Whether the invitation expires within the next two days.
    ///
    /// Display-only: it never affects a transition.
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) if at > now => at - now <= Duration::days(EXPIRING_SOON_WINDOW_DAYS),
            _ => false,
        }
    }
}

/// Validate an email address for an invitation.
///
/// Requires the `local@domain.tld` shape with no whitespace. Returns the
/// trimmed address.
///
/// # Examples
///
/// ```
/// use docshare_org::invitation::validate_email;
///
/// assert_eq!(validate_email(" x@example.com ").unwrap(), "x@example.com");
/// assert!(validate_email("x@localhost").is_err());
/// assert!(validate_email("x y@example.com").is_err());
/// ```
pub fn validate_email(raw: &str) -> OrgResult<String> {
    let email = raw.trim();
    let invalid = || OrgError::InvalidEmail(email.to_string());

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    if local.is_empty() || local.contains('@') {
        return Err(invalid());
    }

    let (_, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if tld.len() < 2 || domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    if !email.validate_email() {
        return Err(invalid());
    }

    Ok(email.to_string())
}
