//! # Docshare Directory
//!
//! Authoritative invitation and membership operations for Docshare
//! organizations.
//!
//! ## Overview
//!
//! The docshare-directory crate handles:
//! - **Store**: The [`DirectoryStore`] system-of-record contract and an
//!   in-memory implementation with atomic joins
//! - **Invitations**: Generate, email, join, revoke, resend and list
//! - **Membership**: Create, update and delete organizations, list members,
//!   change roles, remove members and leave
//! - **Delivery**: Invitation email rendering and the [`InviteMailer`] seam
//!
//! Every operation takes the acting user's ID rather than a cached snapshot.
//! The actor is rebuilt from the store and the authorization policy re-run
//! before each mutation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docshare_directory::{
//!     DirectoryConfig, DirectoryStore, InvitationService, MembershipService, MemoryDirectory,
//!     MemoryMailer,
//! };
//! use docshare_events::MemoryEventBus;
//! use docshare_org::{InviteOptions, UserAccount};
//!
//! async fn example() -> docshare_org::OrgResult<()> {
//!     let store = Arc::new(MemoryDirectory::new());
//!     let bus = Arc::new(MemoryEventBus::new());
//!     let members = MembershipService::new(store.clone(), bus.clone());
//!     let invites = InvitationService::new(
//!         store.clone(),
//!         bus,
//!         Arc::new(MemoryMailer::new()),
//!         DirectoryConfig::default(),
//!     );
//!
//!     let alice = UserAccount::new("alice", "alice@example.com").verified();
//!     let bob = UserAccount::new("bob", "bob@example.com").verified();
//!     let (alice_id, bob_id) = (alice.id, bob.id);
//!     store.insert_user(alice).await?;
//!     store.insert_user(bob).await?;
//!
//!     let org = members.create_organization(alice_id, "Acme", None).await?;
//!     let invite = invites
//!         .generate(org.id, alice_id, InviteOptions::default().max_uses(1))
//!         .await?;
//!     invites.join(invite.invite_code.as_str(), bob_id).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod delivery;
pub mod invitations;
pub mod members;
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use config::DirectoryConfig;
pub use delivery::{format_expiry, InviteEmail, InviteMailer, LogMailer, MemoryMailer};
pub use invitations::InvitationService;
pub use members::MembershipService;
pub use memory::MemoryDirectory;
pub use store::{DeletionSummary, DirectoryStore, JoinOutcome};
