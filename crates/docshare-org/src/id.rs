//! Entity identifiers
//!
//! Records created in-process get time-ordered UUIDs. Records served by the
//! REST backend carry its integer primary keys. Both are an [`EntityId`]; on
//! the wire an integer key is a JSON number and a UUID is a string, and each
//! renders in URL paths the way the backend expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a user, organization, membership or invitation.
///
/// # Examples
///
/// ```
/// use docshare_org::EntityId;
///
/// let key: EntityId = serde_json::from_str("7").unwrap();
/// assert_eq!(key, EntityId::Key(7));
/// assert_eq!(key.to_string(), "7");
///
/// let generated = EntityId::generate();
/// let parsed: EntityId = generated.to_string().parse().unwrap();
/// assert_eq!(parsed, generated);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Integer primary key assigned by the backend
    Key(i64),

    /// UUIDv7 generated locally
    Uuid(Uuid),
}

impl EntityId {
    /// Generate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        EntityId::Uuid(Uuid::now_v7())
    }

    /// The integer key, if this is one.
    pub fn as_key(&self) -> Option<i64> {
        match self {
            EntityId::Key(key) => Some(*key),
            EntityId::Uuid(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Key(key) => write!(f, "{}", key),
            EntityId::Uuid(uuid) => write!(f, "{}", uuid),
        }
    }
}

/// Error returned when a string is neither an integer key nor a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid identifier: {0}")]
pub struct ParseIdError(String);

impl FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(key) = s.parse::<i64>() {
            return Ok(EntityId::Key(key));
        }
        Uuid::parse_str(s)
            .map(EntityId::Uuid)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

impl From<i64> for EntityId {
    fn from(key: i64) -> Self {
        EntityId::Key(key)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        EntityId::Uuid(uuid)
    }
}
