//! Event types for the organization and invitation lifecycle
//!
//! This module defines the event envelope and the typed events published
//! after every successful lifecycle transition.

use chrono::{DateTime, Utc};
use docshare_org::{EntityId, InviteType, OrganizationRole};
use serde::{Deserialize, Serialize};

/// Lifecycle event envelope.
///
/// All events are wrapped in this envelope, which carries the routing
/// topic and the organization and user context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: EntityId,

    /// Event type (e.g., "invite.consumed", "member.removed")
    pub event_type: String,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Organization context
    pub org_id: Option<EntityId>,

    /// User who triggered the event
    pub user_id: Option<EntityId>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type string
    /// * `payload` - The event payload
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: EntityId::generate(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            org_id: None,
            user_id: None,
            version: 1,
            payload,
        }
    }

    /// Set organization context.
    pub fn with_org(mut self, org_id: EntityId) -> Self {
        self.org_id = Some(org_id);
        self
    }

    /// Set user context.
    pub fn with_user(mut self, user_id: EntityId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Get the topic for this event.
    ///
    /// Topics are the event type itself: `{category}.{name}`.
    pub fn topic(&self) -> &str {
        &self.event_type
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Event categories for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Invitation events
    Invitation,
    /// Membership events
    Membership,
    /// Organization events
    Organization,
}

impl EventCategory {
    /// Parse from event type string.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type.split('.').next()? {
            "invite" => Some(EventCategory::Invitation),
            "member" => Some(EventCategory::Membership),
            "organization" => Some(EventCategory::Organization),
            _ => None,
        }
    }
}

// ============================================================================
// Invitation Events
// ============================================================================

/// Invitation lifecycle events.
///
/// Payloads carry invitation IDs, never the invite code itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvitationEvent {
    /// A code invitation was generated
    Generated {
        invitation_id: EntityId,
        organization_id: EntityId,
        created_by_id: EntityId,
        expires_at: Option<DateTime<Utc>>,
        max_uses: Option<u32>,
    },
    /// An email invitation was created and handed to delivery
    Emailed {
        invitation_id: EntityId,
        organization_id: EntityId,
        created_by_id: EntityId,
        email: String,
    },
    /// An invitation was used to join
    Consumed {
        invitation_id: EntityId,
        organization_id: EntityId,
        user_id: EntityId,
        used_count: u32,
    },
    /// An invitation was revoked
    Revoked {
        invitation_id: EntityId,
        organization_id: EntityId,
        revoked_by_id: EntityId,
    },
    /// An email invitation was re-delivered
    Resent {
        invitation_id: EntityId,
        organization_id: EntityId,
        resent_by_id: EntityId,
    },
}

impl InvitationEvent {
    /// Event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            InvitationEvent::Generated { .. } => "invite.generated",
            InvitationEvent::Emailed { .. } => "invite.emailed",
            InvitationEvent::Consumed { .. } => "invite.consumed",
            InvitationEvent::Revoked { .. } => "invite.revoked",
            InvitationEvent::Resent { .. } => "invite.resent",
        }
    }

    /// Invite type the event concerns.
    pub fn invite_type(&self) -> Option<InviteType> {
        match self {
            InvitationEvent::Generated { .. } => Some(InviteType::Code),
            InvitationEvent::Emailed { .. } | InvitationEvent::Resent { .. } => {
                Some(InviteType::Email)
            }
            _ => None,
        }
    }

    fn organization_id(&self) -> EntityId {
        match self {
            InvitationEvent::Generated { organization_id, .. }
            | InvitationEvent::Emailed { organization_id, .. }
            | InvitationEvent::Consumed { organization_id, .. }
            | InvitationEvent::Revoked { organization_id, .. }
            | InvitationEvent::Resent { organization_id, .. } => *organization_id,
        }
    }

    fn user_id(&self) -> EntityId {
        match self {
            InvitationEvent::Generated { created_by_id, .. }
            | InvitationEvent::Emailed { created_by_id, .. } => *created_by_id,
            InvitationEvent::Consumed { user_id, .. } => *user_id,
            InvitationEvent::Revoked { revoked_by_id, .. } => *revoked_by_id,
            InvitationEvent::Resent { resent_by_id, .. } => *resent_by_id,
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        Event::new(
            self.event_type(),
            serde_json::to_value(self).unwrap_or_default(),
        )
        .with_org(self.organization_id())
        .with_user(self.user_id())
    }
}

// ============================================================================
// Membership Events
// ============================================================================

/// Membership lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A user joined through an invitation
    Joined {
        organization_id: EntityId,
        user_id: EntityId,
        invitation_id: EntityId,
    },
    /// A member was promoted or demoted
    RoleChanged {
        organization_id: EntityId,
        user_id: EntityId,
        old_role: OrganizationRole,
        new_role: OrganizationRole,
        changed_by_id: EntityId,
    },
    /// A member was removed by someone else
    Removed {
        organization_id: EntityId,
        user_id: EntityId,
        removed_by_id: EntityId,
    },
    /// A member left on their own
    Left { organization_id: EntityId, user_id: EntityId },
}

impl MembershipEvent {
    /// Event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            MembershipEvent::Joined { .. } => "member.joined",
            MembershipEvent::RoleChanged { .. } => "member.role_changed",
            MembershipEvent::Removed { .. } => "member.removed",
            MembershipEvent::Left { .. } => "member.left",
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (organization_id, actor_id) = match self {
            MembershipEvent::Joined {
                organization_id,
                user_id,
                ..
            }
            | MembershipEvent::Left {
                organization_id,
                user_id,
            } => (*organization_id, *user_id),
            MembershipEvent::RoleChanged {
                organization_id,
                changed_by_id,
                ..
            } => (*organization_id, *changed_by_id),
            MembershipEvent::Removed {
                organization_id,
                removed_by_id,
                ..
            } => (*organization_id, *removed_by_id),
        };
        Event::new(
            self.event_type(),
            serde_json::to_value(self).unwrap_or_default(),
        )
        .with_org(organization_id)
        .with_user(actor_id)
    }
}

// ============================================================================
// Organization Events
// ============================================================================

/// Organization lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrganizationEvent {
    /// An organization was created
    Created {
        organization_id: EntityId,
        name: String,
        created_by_id: EntityId,
    },
    /// Name, description or settings changed
    Updated {
        organization_id: EntityId,
        updated_by_id: EntityId,
    },
    /// An organization was deleted by its creator
    Deleted {
        organization_id: EntityId,
        deleted_by_id: EntityId,
        members_removed: usize,
        invites_deactivated: usize,
    },
}

impl OrganizationEvent {
    /// Event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            OrganizationEvent::Created { .. } => "organization.created",
            OrganizationEvent::Updated { .. } => "organization.updated",
            OrganizationEvent::Deleted { .. } => "organization.deleted",
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self) -> Event {
        let (organization_id, actor_id) = match self {
            OrganizationEvent::Created {
                organization_id,
                created_by_id,
                ..
            } => (*organization_id, *created_by_id),
            OrganizationEvent::Updated {
                organization_id,
                updated_by_id,
            } => (*organization_id, *updated_by_id),
            OrganizationEvent::Deleted {
                organization_id,
                deleted_by_id,
                ..
            } => (*organization_id, *deleted_by_id),
        };
        Event::new(
            self.event_type(),
            serde_json::to_value(self).unwrap_or_default(),
        )
        .with_org(organization_id)
        .with_user(actor_id)
    }
}
