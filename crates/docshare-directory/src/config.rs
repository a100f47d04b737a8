//! Directory configuration.
//!
//! Settings the invitation and membership services apply when the caller
//! does not supply a value.

use chrono::Duration;
use docshare_org::{OrgError, OrgResult, PageSize};
use serde::{Deserialize, Serialize};

/// Configuration for the directory services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Product name used in invitation emails.
    pub app_name: String,

    /// Front-end origin used to build invite links.
    pub app_origin: String,

    /// How long an email invitation stays valid, in days.
    pub email_invite_ttl_days: i64,

    /// Usage limit for email invitations.
    pub email_invite_max_uses: Option<u32>,

    /// Page size used when a listing request does not carry one.
    pub default_page_size: PageSize,
}

impl Default for DirectoryConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            app_name: "Docshare".to_string(),
            app_origin: "http://localhost:5173".to_string(),
            email_invite_ttl_days: 7,
            email_invite_max_uses: Some(1),
            default_page_size: PageSize::default(),
        }
    }
}

impl DirectoryConfig {
    /// Set the front-end origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.app_origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Email invitation lifetime.
    pub fn email_invite_ttl(&self) -> Duration {
        Duration::days(self.email_invite_ttl_days)
    }

    /// Check the email invitation defaults.
    ///
    /// # Errors
    ///
    /// * [`OrgError::InvalidExpiry`] - the lifetime is shorter than one day
    /// * [`OrgError::InvalidMaxUses`] - the usage limit is zero
    pub fn validate(&self) -> OrgResult<()> {
        if self.email_invite_ttl_days < 1 {
            return Err(OrgError::InvalidExpiry);
        }
        if self.email_invite_max_uses == Some(0) {
            return Err(OrgError::InvalidMaxUses);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.email_invite_ttl(), Duration::days(7));
        assert_eq!(config.email_invite_max_uses, Some(1));
        assert_eq!(config.default_page_size.get(), 10);
    }

    #[test]
    fn test_validate() {
        assert!(DirectoryConfig::default().validate().is_ok());

        let unlimited = DirectoryConfig {
            email_invite_max_uses: None,
            ..Default::default()
        };
        assert!(unlimited.validate().is_ok());

        let zero_uses = DirectoryConfig {
            email_invite_max_uses: Some(0),
            ..Default::default()
        };
        assert_eq!(zero_uses.validate(), Err(OrgError::InvalidMaxUses));

        for days in [0, -3] {
            let config = DirectoryConfig {
                email_invite_ttl_days: days,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(OrgError::InvalidExpiry));
        }
    }

    #[test]
    fn test_origin_trailing_slash_is_stripped() {
        let config = DirectoryConfig::default().with_origin("https://docs.example.com/");
        assert_eq!(config.app_origin, "https://docs.example.com");
    }
}
