//! # Docshare Events
//!
//! This crate provides the lifecycle event bus for Docshare organizations.
//! Invitations are never physically deleted; the events published here keep
//! every generation, consumption, revocation and resend observable.
//!
//! ## Overview
//!
//! The docshare-events crate handles:
//! - **Event Types**: Strongly-typed invitation, membership and organization events
//! - **Event Bus**: Publish/subscribe messaging with topic patterns
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust,no_run
//! use docshare_events::{EventBus, InvitationEvent, MemoryEventBus};
//! use docshare_org::EntityId;
//!
//! async fn publish_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     let revoked = InvitationEvent::Revoked {
//!         invitation_id: EntityId::generate(),
//!         organization_id: EntityId::generate(),
//!         revoked_by_id: EntityId::generate(),
//!     };
//!
//!     bus.publish(revoked.to_event()).await.unwrap();
//! }
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust,no_run
//! use docshare_events::{EventBus, MemoryEventBus};
//!
//! async fn subscribe_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // All invitation events
//!     let mut sub = bus.subscribe("invite.*").await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("Received: {}", event.event_type);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are the event type, `{category}.{name}`:
//! - `invite.consumed` - Specific event
//! - `member.*` - All membership events
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` matches zero or more segments

pub mod bus;
pub mod types;

// Re-export main types
pub use bus::{
    topic_matches, EventBus, EventBusError, EventBusResult, MemoryEventBus, Subscription,
};
pub use types::{Event, EventCategory, InvitationEvent, MembershipEvent, OrganizationEvent};
