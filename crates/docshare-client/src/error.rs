//! Client error types.
//!
//! Lifecycle failures reported by the backend are mapped back onto
//! [`OrgError`] so callers handle the same taxonomy whether a check failed
//! locally or remotely. Transport failures get their own variants.

use docshare_org::OrgError;
use thiserror::Error;

/// Message shown when a failure carries no usable detail.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Client errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// A lifecycle rule rejected the request.
    #[error(transparent)]
    Lifecycle(#[from] OrgError),

    /// The request never reached the backend or the connection broke.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The backend did not answer within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP 401; the local session has been cleared.
    #[error("Session expired")]
    SessionExpired,

    /// The backend returned an error that maps to no lifecycle failure.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error envelope, possibly empty.
        message: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::InvalidResponse(e.to_string())
        } else {
            ClientError::NetworkError(e.to_string())
        }
    }
}

impl ClientError {
    /// The lifecycle error, if this is one.
    pub fn lifecycle(&self) -> Option<&OrgError> {
        match self {
            ClientError::Lifecycle(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the caller must authenticate again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// Message suitable for showing to the person who triggered the request.
    ///
    /// Falls back to [`GENERIC_MESSAGE`] only when there is no detail to show.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Lifecycle(e) => e.user_message(),
            ClientError::NetworkError(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Timeout => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ClientError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Api { .. } | ClientError::InvalidResponse(_) => {
                GENERIC_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let error = ClientError::Api {
            status: 500,
            message: "Database is read-only".to_string(),
        };
        assert_eq!(error.user_message(), "Database is read-only");

        let error = ClientError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(error.user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_lifecycle_messages_pass_through() {
        let error = ClientError::from(OrgError::Expired);
        assert_eq!(error.user_message(), OrgError::Expired.user_message());
        assert_eq!(error.lifecycle(), Some(&OrgError::Expired));
        assert_eq!(error.to_string(), "Invitation has expired");
    }

    #[test]
    fn test_transport_messages_are_distinct() {
        let messages = [
            ClientError::NetworkError("refused".into()).user_message(),
            ClientError::Timeout.user_message(),
            ClientError::SessionExpired.user_message(),
        ];
        assert!(messages.iter().all(|m| m != GENERIC_MESSAGE));
        assert!(ClientError::SessionExpired.requires_login());
        assert!(!ClientError::Timeout.requires_login());
    }
}
