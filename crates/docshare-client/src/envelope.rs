//! Error envelope decoding.
//!
//! The backend reports failures as `{"detail": "..."}`, FastAPI-style
//! `{"detail": [{"msg": "..."}]}`, `{"message": "..."}` or
//! `{"errors": [...]}`, optionally with a `code`/`error_code` field. The
//! message is taken from whichever field is present and the failure is
//! classified back onto [`OrgError`].

use docshare_org::OrgError;
use serde_json::Value;

use crate::error::ClientError;

/// Decoded error body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Human-readable message, if the body carried one.
    pub message: Option<String>,

    /// Machine-readable error code, if the body carried one.
    pub code: Option<String>,
}

impl ErrorEnvelope {
    /// Decode a response body. Non-JSON bodies are used verbatim as the message.
    pub fn parse(body: &str) -> Self {
        let body = body.trim();
        let value = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(_) => {
                return Self {
                    message: non_empty(body),
                    code: None,
                }
            }
        };

        let message = ["detail", "message", "errors", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(message_from));
        let code = ["code", "error_code"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(str::to_string);

        Self { message, code }
    }
}

fn message_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(message_from).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        Value::Object(map) => ["msg", "message", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(message_from)),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Lifecycle error named by an `error_code`.
fn from_code(code: &str, message: &str) -> Option<OrgError> {
    let error = match code.to_ascii_uppercase().as_str() {
        "FORBIDDEN" => OrgError::Forbidden,
        "INVALID_CODE" => OrgError::InvalidCode,
        "EXPIRED" => OrgError::Expired,
        "USAGE_LIMIT_REACHED" => OrgError::UsageLimitReached,
        "ALREADY_IN_ORGANIZATION" => OrgError::AlreadyInOrganization,
        "NOT_VERIFIED" => OrgError::NotVerified,
        "INVALID_EMAIL" => OrgError::InvalidEmail(message.to_string()),
        "NOT_EMAIL_TYPE" => OrgError::NotEmailType,
        "INACTIVE" => OrgError::Inactive,
        "INVALID_EXPIRY" => OrgError::InvalidExpiry,
        "INVALID_MAX_USES" => OrgError::InvalidMaxUses,
        "INVALID_NAME" => OrgError::InvalidName,
        "DELIVERY_FAILED" => OrgError::DeliveryFailed(message.to_string()),
        _ => return None,
    };
    Some(error)
}

/// Lifecycle error recognised from the wording of a message.
///
/// "Invalid or expired invite code" names a bad code, so the code check
/// runs before the expiry check. Revoked wording means `Inactive` on resend
/// but `InvalidCode` on join, where a revoked code is indistinguishable
/// from an unknown one.
fn from_message(message: &str, kind: RequestKind) -> Option<OrgError> {
    let text = message.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    let error = if has("invalid") && has("code") {
        OrgError::InvalidCode
    } else if has("expired") {
        OrgError::Expired
    } else if has("usage limit") || has("maximum number of uses") || has("max uses") {
        OrgError::UsageLimitReached
    } else if has("already") && (has("organization") || has("member")) {
        OrgError::AlreadyInOrganization
    } else if has("not verified") || has("verification") {
        OrgError::NotVerified
    } else if has("only email") || has("not an email") {
        OrgError::NotEmailType
    } else if has("no longer active") || has("revoked") || has("inactive") {
        match kind {
            RequestKind::Join => OrgError::InvalidCode,
            RequestKind::Other => OrgError::Inactive,
        }
    } else if has("email") && (has("invalid") || has("not a valid")) {
        OrgError::InvalidEmail(message.to_string())
    } else {
        return None;
    };
    Some(error)
}

/// Which request produced the failure; a few statuses mean different things
/// on the join endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// `POST /organizations/join/{code}`
    Join,
    /// Any other endpoint
    Other,
}

/// Narrow an error onto the ones a join can fail with.
///
/// Join only refuses an actor who already has an organization or whose
/// email is unverified, and the former has its own error, so a bare
/// `Forbidden` means unverified. Anything else about the code itself is
/// an invalid code.
fn join_error(error: OrgError) -> OrgError {
    match error {
        OrgError::InvalidCode
        | OrgError::Expired
        | OrgError::UsageLimitReached
        | OrgError::AlreadyInOrganization
        | OrgError::NotVerified => error,
        OrgError::Forbidden => OrgError::NotVerified,
        _ => OrgError::InvalidCode,
    }
}

/// Classify a non-success, non-401 response.
///
/// An explicit error code wins over the message wording. Without a code, a
/// 403 is `NotVerified` when its message mentions verification,
/// `AlreadyInOrganization` when it says so, and `Forbidden` otherwise.
/// Join failures are always one of `InvalidCode`, `Expired`,
/// `UsageLimitReached`, `AlreadyInOrganization` or `NotVerified`, except for
/// server errors, which stay [`ClientError::Api`].
pub fn classify(status: u16, body: &str, kind: RequestKind) -> ClientError {
    let envelope = ErrorEnvelope::parse(body);
    let message = envelope.message.unwrap_or_default();

    let lifecycle = match envelope.code.as_deref().and_then(|c| from_code(c, &message)) {
        Some(error) => Some(error),
        None if status == 403 => Some(match from_message(&message, kind) {
            Some(error @ (OrgError::NotVerified | OrgError::AlreadyInOrganization)) => error,
            _ => OrgError::Forbidden,
        }),
        None => from_message(&message, kind),
    };

    match (lifecycle, kind) {
        (Some(error), RequestKind::Join) => join_error(error).into(),
        (Some(error), RequestKind::Other) => error.into(),
        (None, _) if status == 410 => OrgError::Expired.into(),
        (None, RequestKind::Join) if (400..500).contains(&status) => OrgError::InvalidCode.into(),
        (None, _) => ClientError::Api { status, message },
    }
}
