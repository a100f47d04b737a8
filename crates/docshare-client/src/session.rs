//! Local session state.
//!
//! The cached [`Actor`] only decides what to offer in a UI. The backend
//! re-checks every request against its own records.

use docshare_org::Actor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An authenticated session.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Bearer token sent with every request
    pub access_token: String,

    /// Snapshot of the signed-in user
    pub actor: Actor,
}

impl Session {
    /// Create a session.
    pub fn new(access_token: impl Into<String>, actor: Actor) -> Self {
        Self {
            access_token: access_token.into(),
            actor,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[redacted]")
            .field("actor", &self.actor)
            .finish()
    }
}

/// Shared, cloneable holder for the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the current session.
    pub async fn set(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    /// Forget the current session.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    /// A copy of the current session.
    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    /// The bearer token, if signed in.
    pub async fn token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// The cached actor, if signed in.
    pub async fn actor(&self) -> Option<Actor> {
        self.inner.read().await.as_ref().map(|s| s.actor.clone())
    }

    /// Whether a session is present.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Modify the cached actor in place. Does nothing when signed out.
    pub async fn update_actor<F>(&self, f: F)
    where
        F: FnOnce(&mut Actor),
    {
        if let Some(session) = self.inner.write().await.as_mut() {
            f(&mut session.actor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshare_org::EntityId;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated().await);
        assert!(store.token().await.is_none());

        let actor = Actor::new(EntityId::generate(), true);
        store.set(Session::new("tok", actor.clone())).await;
        assert!(store.is_authenticated().await);
        assert_eq!(store.token().await.as_deref(), Some("tok"));
        assert_eq!(store.actor().await, Some(actor));

        store.clear().await;
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store
            .set(Session::new("tok", Actor::new(EntityId::generate(), true)))
            .await;
        assert!(other.is_authenticated().await);

        let org_id = EntityId::generate();
        other
            .update_actor(|actor| actor.organization_id = Some(org_id))
            .await;
        assert_eq!(
            store.actor().await.and_then(|a| a.organization_id),
            Some(org_id)
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token", Actor::new(EntityId::generate(), false));
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("[redacted]"));
    }
}
