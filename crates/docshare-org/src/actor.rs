//! Actors
//!
//! An [`Actor`] is a point-in-time snapshot of the user performing an action:
//! their account flags plus their current membership, if any. Authorization
//! decisions are computed from this snapshot.
//!
//! Snapshots cached on a client are advisory. The directory services rebuild
//! the snapshot from the system of record before every decision.

use serde::{Deserialize, Serialize};
use crate::id::EntityId;

use crate::membership::OrganizationMembership;
use crate::organization::Organization;
use crate::roles::{OrganizationRole, SystemRole};

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAccount {
    /// User ID
    pub id: EntityId,

    /// Unique username
    pub username: String,

    /// Email address
    pub email: String,

    /// Full name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,

    /// System-wide role
    #[serde(default)]
    pub system_role: SystemRole,

    /// Whether the account may sign in
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl UserAccount {
    /// Creates a new, unverified, active account.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            username: username.into(),
            email: email.into(),
            full_name: None,
            email_verified: false,
            system_role: SystemRole::User,
            is_active: true,
        }
    }

    /// Mark the email address as verified.
    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }

    /// Set the full name.
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Set the system role.
    pub fn with_system_role(mut self, role: SystemRole) -> Self {
        self.system_role = role;
        self
    }
}

/// Snapshot of the acting user.
///
/// # Examples
///
/// ```
/// use docshare_org::{Actor, EntityId, Organization, OrganizationMembership, UserAccount};
///
/// let account = UserAccount::new("alice", "alice@example.com").verified();
/// let org = Organization::new("Acme", account.id);
/// let membership = OrganizationMembership::creator(&org);
///
/// let actor = Actor::from_account(&account, Some(&membership));
/// assert!(actor.belongs_to(&org));
/// assert!(actor.is_admin_of(&org));
/// assert!(actor.is_creator_of(&org));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    /// User ID
    pub user_id: EntityId,

    /// Whether the user's email address is verified
    #[serde(default)]
    pub email_verified: bool,

    /// System-wide role
    #[serde(default)]
    pub system_role: SystemRole,

    /// Organization the user currently belongs to
    #[serde(default)]
    pub organization_id: Option<EntityId>,

    /// Role within that organization
    #[serde(default)]
    pub role: Option<OrganizationRole>,
}

impl Actor {
    /// Snapshot a user with no organization.
    pub fn new(user_id: EntityId, email_verified: bool) -> Self {
        Self {
            user_id,
            email_verified,
            system_role: SystemRole::User,
            organization_id: None,
            role: None,
        }
    }

    /// Build a snapshot from an account and its current membership.
    pub fn from_account(account: &UserAccount, membership: Option<&OrganizationMembership>) -> Self {
        Self {
            user_id: account.id,
            email_verified: account.email_verified,
            system_role: account.system_role,
            organization_id: membership.map(|m| m.organization_id),
            role: membership.map(|m| m.role),
        }
    }

    /// Place the snapshot in an organization with the given role.
    pub fn in_organization(mut self, organization_id: EntityId, role: OrganizationRole) -> Self {
        self.organization_id = Some(organization_id);
        self.role = Some(role);
        self
    }

    /// Set the system role.
    pub fn with_system_role(mut self, role: SystemRole) -> Self {
        self.system_role = role;
        self
    }

    /// Whether the user belongs to any organization.
    pub fn has_organization(&self) -> bool {
        self.organization_id.is_some()
    }

    /// Whether the user belongs to `organization`.
    pub fn belongs_to(&self, organization: &Organization) -> bool {
        self.organization_id == Some(organization.id)
    }

    /// Whether the user is an admin of `organization`.
    ///
    /// Roles are scoped to a membership, so an admin role in another
    /// organization does not count.
    pub fn is_admin_of(&self, organization: &Organization) -> bool {
        self.belongs_to(organization) && self.role.map(|r| r.is_admin()).unwrap_or(false)
    }

    /// Whether the user created `organization`.
    pub fn is_creator_of(&self, organization: &Organization) -> bool {
        organization.is_creator(self.user_id)
    }

    /// Whether the user is a platform operator.
    pub fn is_super_admin(&self) -> bool {
        self.system_role.is_super_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_without_organization() {
        let account = UserAccount::new("bob", "bob@example.com");
        let actor = Actor::from_account(&account, None);
        let org = Organization::new("Acme", EntityId::generate());

        assert!(!actor.has_organization());
        assert!(!actor.email_verified);
        assert!(!actor.belongs_to(&org));
        assert!(!actor.is_admin_of(&org));
    }

    #[test]
    fn test_admin_of_other_org_is_not_admin() {
        let org = Organization::new("Acme", EntityId::generate());
        let other = Organization::new("Other", EntityId::generate());
        let actor = Actor::new(EntityId::generate(), true).in_organization(other.id, OrganizationRole::Admin);

        assert!(actor.is_admin_of(&other));
        assert!(!actor.is_admin_of(&org));
    }

    #[test]
    fn test_member_is_not_admin() {
        let org = Organization::new("Acme", EntityId::generate());
        let actor = Actor::new(EntityId::generate(), true).in_organization(org.id, OrganizationRole::Member);

        assert!(actor.belongs_to(&org));
        assert!(!actor.is_admin_of(&org));
        assert!(!actor.is_creator_of(&org));
    }

    #[test]
    fn test_account_builder() {
        let account = UserAccount::new("root", "root@example.com")
            .verified()
            .with_full_name("Root")
            .with_system_role(SystemRole::SuperAdmin);

        let actor = Actor::from_account(&account, None);
        assert!(actor.email_verified);
        assert!(actor.is_super_admin());
        assert_eq!(account.full_name.as_deref(), Some("Root"));
    }
}
