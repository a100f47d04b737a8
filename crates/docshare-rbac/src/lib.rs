//! # Docshare RBAC
//!
//! This crate decides who may do what inside a Docshare organization.
//!
//! ## Overview
//!
//! The docshare-rbac crate handles:
//! - **Actions**: Every operation the policy knows about
//! - **Policy**: A pure `can_perform` function over an actor snapshot, an
//!   organization and an optional target membership
//!
//! The same policy runs in two places: front ends use it to decide which
//! controls to render, and the directory services re-run it against fresh
//! state before every mutation. Only the second decision is authoritative.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docshare_org::{Actor, EntityId, Organization, OrganizationRole};
//! use docshare_rbac::{can_perform, Action};
//!
//! let creator_id = EntityId::generate();
//! let org = Organization::new("Acme", creator_id);
//! let creator = Actor::new(creator_id, true).in_organization(org.id, OrganizationRole::Admin);
//!
//! assert!(can_perform(Action::InviteMembers, &creator, Some(&org), None));
//! assert!(!can_perform(Action::LeaveOrganization, &creator, Some(&org), None));
//! ```

pub mod actions;
pub mod policy;

// Re-export main types for convenience
pub use actions::Action;
pub use policy::{allowed_actions, authorize, can_perform, can_perform_named};
