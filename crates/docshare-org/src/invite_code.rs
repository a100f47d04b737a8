//! Invite codes and invite links
//!
//! An invite code is the opaque token that identifies a code-type invitation.
//! It must be 8 to 32 characters drawn from `[A-Za-z0-9_-]`. Format validity is
//! checked before any lookup; a well-formed code still has to resolve to a
//! pending or active invitation to be accepted.
//!
//! Codes travel inside links of the form `{origin}/join/{code}`. Email
//! invitations also use `{origin}/accept-invite?code={code}`. Both forms parse
//! back to the same code.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OrgError, OrgResult};

/// Shortest accepted code.
pub const MIN_CODE_LEN: usize = 8;

/// Longest accepted code.
pub const MAX_CODE_LEN: usize = 32;

/// Length of generated codes.
pub const GENERATED_CODE_LEN: usize = 16;

const GENERATED_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A format-validated invite code.
///
/// # Examples
///
/// ```
/// use docshare_org::InviteCode;
///
/// let code = InviteCode::parse("team-2024_abc").unwrap();
/// assert_eq!(code.as_str(), "team-2024_abc");
///
/// assert!(InviteCode::parse("AB").is_err());
/// assert!(InviteCode::parse("has space!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InviteCode(String);

impl InviteCode {
    /// Validate and wrap a code.
    ///
    /// Surrounding whitespace is trimmed; anything else outside the allowed
    /// charset or length range fails with [`OrgError::InvalidCode`].
    pub fn parse(raw: &str) -> OrgResult<Self> {
        let code = raw.trim();
        if is_valid_format(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(OrgError::InvalidCode)
        }
    }

    /// Generate a fresh random code.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..GENERATED_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..GENERATED_CHARSET.len());
                GENERATED_CHARSET[idx] as char
            })
            .collect();
        Self(code)
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A shortened form for logs: the first four characters followed by `…`.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}…", prefix)
    }

    /// Build the shareable join link for this code.
    pub fn join_link(&self, origin: &str) -> String {
        format!("{}/join/{}", origin.trim_end_matches('/'), self.0)
    }

    /// Build the magic link used in invitation emails.
    pub fn accept_link(&self, origin: &str) -> String {
        format!("{}/accept-invite?code={}", origin.trim_end_matches('/'), self.0)
    }

    /// Extract and validate the code from a join or accept link.
    ///
    /// Accepts `…/join/{code}` (with optional trailing slash, query or
    /// fragment) and `…/accept-invite?code={code}`. A bare code is accepted as
    /// well, so a pasted link and a typed code take the same path.
    ///
    /// # Examples
    ///
    /// ```
    /// use docshare_org::InviteCode;
    ///
    /// let code = InviteCode::parse("Xy7Kp2Qa9Lm3").unwrap();
    /// let link = code.join_link("https://docs.example.com");
    /// assert_eq!(InviteCode::from_link(&link).unwrap(), code);
    ///
    /// let accept = code.accept_link("https://docs.example.com/");
    /// assert_eq!(InviteCode::from_link(&accept).unwrap(), code);
    /// ```
    pub fn from_link(link: &str) -> OrgResult<Self> {
        let link = link.trim();

        if let Some(idx) = link.find("/join/") {
            let rest = &link[idx + "/join/".len()..];
            let end = rest
                .find(|c: char| matches!(c, '/' | '?' | '#'))
                .unwrap_or(rest.len());
            return Self::parse(&rest[..end]);
        }

        if let Some(idx) = link.find('?') {
            let query = &link[idx + 1..];
            let query = query.split('#').next().unwrap_or_default();
            for pair in query.split('&') {
                if let Some(value) = pair.strip_prefix("code=") {
                    return Self::parse(value);
                }
            }
            return Err(OrgError::InvalidCode);
        }

        Self::parse(link)
    }
}

/// Check the invite code format without allocating.
pub fn is_valid_format(code: &str) -> bool {
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len())
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl std::fmt::Display for InviteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InviteCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InviteCode {
    type Error = OrgError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InviteCode> for String {
    fn from(code: InviteCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(InviteCode::parse("AB").is_err());
        assert!(InviteCode::parse("abcdefg").is_err());
        assert!(InviteCode::parse("abcdefgh").is_ok());
        assert!(InviteCode::parse(&"a".repeat(32)).is_ok());
        assert!(InviteCode::parse(&"a".repeat(33)).is_err());
        assert!(InviteCode::parse("").is_err());
    }

    #[test]
    fn test_charset() {
        assert!(InviteCode::parse("abc-DEF_123").is_ok());
        assert!(InviteCode::parse("abc DEF 123").is_err());
        assert!(InviteCode::parse("abc.def.123").is_err());
        assert!(InviteCode::parse("abcdéfgh12").is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code = InviteCode::parse("  abcdefgh12 \n").unwrap();
        assert_eq!(code.as_str(), "abcdefgh12");
    }

    #[test]
    fn test_short_code_error_is_invalid_code() {
        assert!(matches!(InviteCode::parse("AB"), Err(OrgError::InvalidCode)));
    }

    #[test]
    fn test_generated_codes_are_valid_and_distinct() {
        let a = InviteCode::generate();
        let b = InviteCode::generate();
        assert_eq!(a.as_str().len(), GENERATED_CODE_LEN);
        assert!(is_valid_format(a.as_str()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_join_link_round_trip() {
        let code = InviteCode::parse("Xy7Kp2Qa9Lm3").unwrap();
        let link = code.join_link("https://docs.example.com/");
        assert_eq!(link, "https://docs.example.com/join/Xy7Kp2Qa9Lm3");
        assert_eq!(InviteCode::from_link(&link).unwrap(), code);
    }

    #[test]
    fn test_link_variants() {
        let expected = InviteCode::parse("Xy7Kp2Qa9Lm3").unwrap();
        for link in [
            "https://docs.example.com/join/Xy7Kp2Qa9Lm3/",
            "https://docs.example.com/join/Xy7Kp2Qa9Lm3?ref=mail",
            "https://docs.example.com/join/Xy7Kp2Qa9Lm3#top",
            "https://docs.example.com/accept-invite?code=Xy7Kp2Qa9Lm3",
            "https://docs.example.com/accept-invite?utm=x&code=Xy7Kp2Qa9Lm3#f",
            "Xy7Kp2Qa9Lm3",
        ] {
            assert_eq!(InviteCode::from_link(link).unwrap(), expected, "{}", link);
        }
    }

    #[test]
    fn test_bad_links() {
        assert!(InviteCode::from_link("https://docs.example.com/join/AB").is_err());
        assert!(InviteCode::from_link("https://docs.example.com/accept-invite?x=1").is_err());
    }

    #[test]
    fn test_redacted() {
        let code = InviteCode::parse("Xy7Kp2Qa9Lm3").unwrap();
        assert_eq!(code.redacted(), "Xy7K…");
    }

    #[test]
    fn test_serde_validates() {
        let code: InviteCode = serde_json::from_str("\"abcdefgh12\"").unwrap();
        assert_eq!(code.as_str(), "abcdefgh12");
        assert!(serde_json::from_str::<InviteCode>("\"AB\"").is_err());
    }
}
