//! # Docshare Client
//!
//! REST client for Docshare's organization, invitation and member endpoints.
//!
//! ## Overview
//!
//! The docshare-client crate handles:
//! - **Requests**: Typed calls for every invitation and membership endpoint
//! - **Errors**: Decoding of the backend's error envelopes back onto the
//!   lifecycle error taxonomy, plus transport failures
//! - **Session**: The bearer token and a cached, advisory actor snapshot;
//!   any 401 clears it
//! - **Listings**: Page/search state and a cancellable search debouncer
//!
//! Invite codes, email addresses and invite options are validated locally
//! before a request is made. No request is ever retried.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docshare_client::{ClientConfig, OrgClient, Session, SessionStore};
//! use docshare_org::{Actor, EntityId, InviteOptions};
//!
//! async fn example() -> docshare_client::ClientResult<()> {
//!     let session = SessionStore::with_session(Session::new(
//!         "access-token",
//!         Actor::new(EntityId::generate(), true),
//!     ));
//!     let client = OrgClient::new(ClientConfig::from_env(), session);
//!
//!     let org_id = EntityId::generate();
//!     let invite = client
//!         .generate_code(org_id, InviteOptions::default().max_uses(5))
//!         .await?;
//!     println!("Share {}", client.invite_link(&invite));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod debounce;
pub mod envelope;
pub mod error;
pub mod listing;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::OrgClient;
pub use config::{ClientConfig, ConfigError};
pub use debounce::SearchDebouncer;
pub use envelope::{classify, ErrorEnvelope, RequestKind};
pub use error::{ClientError, ClientResult};
pub use listing::ListState;
pub use session::{Session, SessionStore};
