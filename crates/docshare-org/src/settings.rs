//! Organization settings
//!
//! Settings control organization-wide behavior that is not tied to a single
//! membership, such as whether regular members may invite others.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Organization-level settings.
///
/// Unknown keys sent by the backend are preserved in `custom` so a settings
/// round-trip through this type never drops data.
///
/// # Examples
///
/// ```
/// use docshare_org::OrganizationSettings;
///
/// let settings = OrganizationSettings::default();
/// assert!(!settings.allow_member_invites);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrganizationSettings {
    /// Allow members without the admin role to issue invitations
    #[serde(default)]
    pub allow_member_invites: bool,

    /// Any other settings keys
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl OrganizationSettings {
    /// Settings with member invites enabled.
    pub fn with_member_invites(mut self, allowed: bool) -> Self {
        self.allow_member_invites = allowed;
        self
    }
}
