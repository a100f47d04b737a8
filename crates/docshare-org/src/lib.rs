//! # Docshare Organization Model
//!
//! This crate provides the organization, membership and invitation domain
//! model for Docshare, shared by the directory services and the API client.
//!
//! ## Overview
//!
//! The docshare-org crate handles:
//! - **Organizations**: Tenant groupings with exactly one, immutable creator
//! - **Memberships**: User-organization links with an admin or member role
//! - **Actors**: Snapshots of the acting user used for authorization
//! - **Invitations**: Code and email invitations with derived status
//! - **Invite codes**: Format validation, generation and invite links
//! - **Identifiers**: Backend integer keys or locally generated UUIDs
//! - **Pagination**: The page/page size/total count contract for listings
//!
//! ## Architecture
//!
//! ```text
//! UserAccount ─ Actor (snapshot)
//!   └─ OrganizationMembership ─→ Organization
//!                                   ├─ Settings
//!                                   └─ Invitations
//!                                         └─ InviteCode
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use docshare_org::{EntityId, Invitation, InviteOptions, Organization, OrganizationMembership};
//!
//! // Create an organization; its creator becomes an admin
//! let creator_id = EntityId::generate();
//! let org = Organization::new("Acme Corp", creator_id);
//! let membership = OrganizationMembership::creator(&org);
//!
//! // Issue a single-use code invitation valid for a week
//! let now = Utc::now();
//! let invite = Invitation::code(
//!     org.id,
//!     creator_id,
//!     InviteOptions::default().expires_in(now, Duration::days(7)).max_uses(1),
//! );
//! println!("{}", invite.invite_code.join_link("https://docs.example.com"));
//! ```

pub mod actor;
pub mod error;
pub mod id;
pub mod invitation;
pub mod invite_code;
pub mod membership;
pub mod organization;
pub mod pagination;
pub mod roles;
pub mod settings;

// Re-export main types for convenience
pub use actor::{Actor, UserAccount};
pub use error::{OrgError, OrgResult};
pub use id::{EntityId, ParseIdError};
pub use invitation::{
    validate_email, Invitation, InvitationStatus, InviteFilter, InviteOptions, InviteType,
};
pub use invite_code::InviteCode;
pub use membership::{MemberSummary, OrganizationMembership};
pub use organization::{validate_name, Organization, OrganizationUpdate};
pub use pagination::{DisplayRange, Page, PageRequest, PageSize, Pagination, PAGE_SIZES};
pub use roles::{OrganizationRole, SystemRole};
pub use settings::OrganizationSettings;
