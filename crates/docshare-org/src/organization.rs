//! Organization domain models
//!
//! This module provides the Organization entity. An organization is a tenant
//! grouping of users with exactly one creator. The creator is fixed at
//! creation time and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::id::EntityId;

use crate::error::{OrgError, OrgResult};
use crate::settings::OrganizationSettings;

/// An organization groups users, documents and invitations.
///
/// # Architecture
///
/// ```text
/// Organization
///   ├─ Creator (permanent admin)
///   ├─ Members (via OrganizationMembership)
///   ├─ Invitations
///   └─ Settings
/// ```
///
/// # Examples
///
/// ```
/// use docshare_org::{EntityId, Organization};
///
/// let creator_id = EntityId::generate();
/// let org = Organization::new("Acme Corp", creator_id);
/// assert_eq!(org.name, "Acme Corp");
/// assert!(org.is_creator(creator_id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    /// Unique identifier for the organization
    pub id: EntityId,

    /// Human-readable name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// The user who created the organization
    created_by_id: EntityId,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,

    /// Organization-level settings
    #[serde(default)]
    pub settings: OrganizationSettings,
}

impl Organization {
    /// Creates a new organization with default settings.
    ///
    /// # Arguments
    ///
    /// * `name` - The organization name
    /// * `created_by_id` - The user creating the organization
    pub fn new(name: impl Into<String>, created_by_id: EntityId) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::generate(),
            name: name.into(),
            description: None,
            created_by_id,
            created_at: now,
            updated_at: now,
            settings: OrganizationSettings::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: OrganizationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The user who created the organization.
    ///
    /// There is no setter: the creator is immutable after creation.
    pub fn created_by_id(&self) -> EntityId {
        self.created_by_id
    }

    /// Check whether `user_id` is the creator of this organization.
    pub fn is_creator(&self, user_id: EntityId) -> bool {
        self.created_by_id == user_id
    }

    /// Whether members without the admin role may invite others.
    pub fn allows_member_invites(&self) -> bool {
        self.settings.allow_member_invites
    }

    /// Apply a partial update, bumping `updated_at` when anything changed.
    ///
    /// # Returns
    ///
    /// `true` if at least one field was modified
    pub fn apply(&mut self, update: OrganizationUpdate) -> bool {
        let mut changed = false;

        if let Some(name) = update.name {
            if name != self.name {
                self.name = name;
                changed = true;
            }
        }
        if let Some(description) = update.description {
            let description = Some(description).filter(|d| !d.trim().is_empty());
            if description != self.description {
                self.description = description;
                changed = true;
            }
        }
        if let Some(settings) = update.settings {
            if settings != self.settings {
                self.settings = settings;
                changed = true;
            }
        }

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

/// Longest accepted organization name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Validate an organization name, returning it trimmed.
pub fn validate_name(raw: &str) -> OrgResult<String> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(OrgError::InvalidName);
    }
    Ok(name.to_string())
}

/// Partial update for an organization's editable fields.
///
/// `None` leaves a field untouched. An empty description clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<OrganizationSettings>,
}
