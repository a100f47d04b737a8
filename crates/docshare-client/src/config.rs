//! Client configuration.
//!
//! Loaded from environment variables with defaults for local development.

use docshare_org::PageSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration for [`crate::OrgClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g., "https://docs.example.com/api").
    pub api_url: String,

    /// Front-end origin used when building invite links.
    pub app_origin: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Quiet period before a search query triggers a fetch, in milliseconds.
    pub search_debounce_ms: u64,

    /// Initial page size for listings.
    pub default_page_size: u32,
}

impl Default for ClientConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            app_origin: "http://localhost:5173".to_string(),
            timeout_secs: 30,
            search_debounce_ms: 300,
            default_page_size: 10,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOCSHARE_API_URL`: REST API base URL (default: http://localhost:8000/api)
    /// - `DOCSHARE_APP_ORIGIN`: Front-end origin for invite links (default: http://localhost:5173)
    /// - `DOCSHARE_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `DOCSHARE_SEARCH_DEBOUNCE_MS`: Search debounce window (default: 300)
    /// - `DOCSHARE_DEFAULT_PAGE_SIZE`: Initial page size, one of 5/10/25/50 (default: 10)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_url: std::env::var("DOCSHARE_API_URL").unwrap_or(default.api_url),
            app_origin: std::env::var("DOCSHARE_APP_ORIGIN").unwrap_or(default.app_origin),
            timeout_secs: std::env::var("DOCSHARE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            search_debounce_ms: std::env::var("DOCSHARE_SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.search_debounce_ms),
            default_page_size: std::env::var("DOCSHARE_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.default_page_size),
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "DOCSHARE_API_URL",
                "must be an http(s) URL",
            ));
        }
        if !(self.app_origin.starts_with("http://") || self.app_origin.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "DOCSHARE_APP_ORIGIN",
                "must be an http(s) URL",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "DOCSHARE_TIMEOUT_SECS",
                "must be at least 1",
            ));
        }
        self.page_size()?;
        Ok(())
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the search debounce window as a Duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// The configured initial page size.
    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        PageSize::new(self.default_page_size).map_err(|_| {
            ConfigError::invalid("DOCSHARE_DEFAULT_PAGE_SIZE", "must be one of 5, 10, 25, 50")
        })
    }

    /// Build a full URL by appending a path to the API base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// The front-end origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.app_origin.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.page_size().unwrap().get(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url() {
        let config = ClientConfig {
            api_url: "https://docs.example.com/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.url("/organizations/join/abc"),
            "https://docs.example.com/api/organizations/join/abc"
        );
        assert_eq!(config.url("organizations"), "https://docs.example.com/api/organizations");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ClientConfig {
            default_page_size: 7,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "DOCSHARE_DEFAULT_PAGE_SIZE"
        ));

        let config = ClientConfig {
            api_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_origin_trims_slash() {
        let config = ClientConfig {
            app_origin: "https://docs.example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.origin(), "https://docs.example.com");
    }
}
