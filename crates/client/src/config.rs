//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOLIO_API_URL` - Base URL of the Folio storefront API
//!   (e.g., `https://api.folio.example/api`)
//!
//! ## Optional
//! - `FOLIO_STATE_FILE` - Path of the JSON file holding session, refresh
//!   credential, and cart (used by file-backed storage; in-memory storage
//!   ignores it)
//! - `SENTRY_DSN` - Sentry error tracking DSN (binaries only)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Folio client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront API. Request paths are joined onto this.
    pub api_url: Url,
    /// Path of the persisted state file, when file-backed storage is used.
    pub state_file: Option<PathBuf>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `FOLIO_API_URL` is missing or not a valid
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_required_env("FOLIO_API_URL")?)?;
        let state_file = get_optional_env("FOLIO_STATE_FILE").map(PathBuf::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            state_file,
            sentry_dsn,
        })
    }

    /// Build a configuration from a known API URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not a valid http(s) URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            state_file: None,
            sentry_dsn: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse and validate the API base URL.
fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("FOLIO_API_URL".to_string(), e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            "FOLIO_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "FOLIO_API_URL".to_string(),
            "missing host".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_api_url() {
        let config = ClientConfig::new("https://api.folio.example/api").unwrap();
        assert_eq!(config.api_url.host_str(), Some("api.folio.example"));
        assert!(config.state_file.is_none());
    }

    #[test]
    fn test_localhost_api_url() {
        let config = ClientConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(config.api_url.port(), Some(5000));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ClientConfig::new("ftp://api.folio.example");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let result = ClientConfig::new("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("FOLIO_API_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: FOLIO_API_URL"
        );
    }
}
