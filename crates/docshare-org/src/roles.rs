//! Roles
//!
//! This module defines the organization-scoped roles a membership can hold and
//! the system-level role carried by every user account.

use serde::{Deserialize, Serialize};

/// User role within an organization.
///
/// Roles are ordered: Member < Admin. The creator of an organization always
/// holds the Admin role; that is enforced by the membership operations, not by
/// this type.
///
/// # Examples
///
/// ```
/// use docshare_org::OrganizationRole;
///
/// let role = OrganizationRole::Admin;
/// assert!(role.is_admin());
/// assert!(!OrganizationRole::Member.is_admin());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    /// Regular member
    Member = 1,

    /// Can manage members, invitations and organization details
    Admin = 2,
}

impl OrganizationRole {
    /// Check if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        *self >= OrganizationRole::Admin
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(OrganizationRole)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use docshare_org::OrganizationRole;
    ///
    /// assert_eq!(OrganizationRole::parse("admin"), Some(OrganizationRole::Admin));
    /// assert_eq!(OrganizationRole::parse("MEMBER"), Some(OrganizationRole::Member));
    /// assert_eq!(OrganizationRole::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Admin => "Admin",
        }
    }
}

impl Default for OrganizationRole {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System-wide role of a user account.
///
/// This is independent of any organization. A `SuperAdmin` is a platform
/// operator and passes every authorization rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    /// Regular account
    #[default]
    User,

    /// Platform operator
    #[serde(alias = "admin")]
    SuperAdmin,
}

impl SystemRole {
    /// Check if this is the platform operator role.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, SystemRole::SuperAdmin)
    }

    /// Parse from string representation (`"user"`, `"super_admin"` or `"admin"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Self::User),
            "super_admin" | "superadmin" | "admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::SuperAdmin => "super_admin",
        }
    }
}
