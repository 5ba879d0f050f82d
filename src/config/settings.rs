//! # Configuration Settings
//!
//! Defines the configuration accepted by a secret manager.

use crate::errors::{Error, Result};
use crate::secrets::{NameNormalization, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

pub const DEFAULT_IDENTITY_URL: &str = "https://identity.bitwarden.com";
pub const DEFAULT_API_URL: &str = "https://api.bitwarden.com";
pub const DEFAULT_CACHE_DURATION_SECONDS: u64 = 900;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Secret manager configuration. Immutable once a manager is built from it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManagerConfig {
    /// Machine access token used to log in to the secret service
    #[validate(custom(function = "validate_access_token"))]
    pub access_token: SecretString,

    /// Organization whose secrets are listed
    #[validate(length(min = 1, message = "Organization ID cannot be empty"))]
    pub organization_id: String,

    /// Identity service endpoint (token exchange)
    #[validate(url(message = "Identity URL must be a valid URL"))]
    pub identity_url: String,

    /// Secret service API endpoint
    #[validate(url(message = "API URL must be a valid URL"))]
    pub api_url: String,

    /// Nominal cache lifetime in seconds. Accepted and reported, not enforced.
    #[serde(default = "default_cache_duration_seconds")]
    pub cache_duration_seconds: u64,

    /// How secret names are canonicalized before indexing and lookup
    #[serde(default)]
    pub name_normalization: NameNormalization,

    /// Per-request timeout for the HTTP secret source
    #[serde(default = "default_request_timeout_seconds")]
    #[validate(range(
        min = 1,
        max = 300,
        message = "Request timeout must be between 1 and 300 seconds"
    ))]
    pub request_timeout_seconds: u64,
}

fn default_cache_duration_seconds() -> u64 {
    DEFAULT_CACHE_DURATION_SECONDS
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn validate_access_token(token: &SecretString) -> std::result::Result<(), ValidationError> {
    if token.expose_secret().trim().is_empty() {
        let mut err = ValidationError::new("access_token");
        err.message = Some("Access token cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

impl ManagerConfig {
    /// Create a configuration against the default endpoints.
    pub fn new(access_token: impl Into<SecretString>, organization_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            organization_id: organization_id.into(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            cache_duration_seconds: DEFAULT_CACHE_DURATION_SECONDS,
            name_normalization: NameNormalization::None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }

    pub fn with_endpoints(
        mut self,
        identity_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        self.identity_url = identity_url.into();
        self.api_url = api_url.into();
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration_seconds = duration.as_secs();
        self
    }

    pub fn with_name_normalization(mut self, normalization: NameNormalization) -> Self {
        self.name_normalization = normalization;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_seconds = timeout.as_secs();
        self
    }

    /// Get the nominal cache duration
    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_seconds)
    }

    /// Get the HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)
    }

    /// Create configuration from `BWS_*` environment variables.
    ///
    /// `BWS_ACCESS_TOKEN` and `BWS_ORGANIZATION_ID` are required; endpoints
    /// default to the hosted service.
    pub fn from_env() -> Result<Self> {
        let access_token = required_var("BWS_ACCESS_TOKEN")?;
        let organization_id = required_var("BWS_ORGANIZATION_ID")?;

        let identity_url = std::env::var("BWS_IDENTITY_URL")
            .unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_string());
        let api_url =
            std::env::var("BWS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let cache_duration_seconds =
            parsed_var("BWS_CACHE_DURATION_SECONDS", DEFAULT_CACHE_DURATION_SECONDS)?;
        let request_timeout_seconds =
            parsed_var("BWS_REQUEST_TIMEOUT_SECONDS", DEFAULT_REQUEST_TIMEOUT_SECONDS)?;

        let name_normalization = match std::env::var("BWS_NAME_NORMALIZATION") {
            Ok(value) => value
                .parse::<NameNormalization>()
                .map_err(|e| Error::config(format!("Invalid BWS_NAME_NORMALIZATION: {}", e)))?,
            Err(_) => NameNormalization::None,
        };

        Ok(Self {
            access_token: SecretString::new(access_token),
            organization_id,
            identity_url,
            api_url,
            cache_duration_seconds,
            name_normalization,
            request_timeout_seconds,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::config(format!("{} is not set", name))),
    }
}

fn parsed_var(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const VARS: [&str; 7] = [
        "BWS_ACCESS_TOKEN",
        "BWS_ORGANIZATION_ID",
        "BWS_IDENTITY_URL",
        "BWS_API_URL",
        "BWS_CACHE_DURATION_SECONDS",
        "BWS_NAME_NORMALIZATION",
        "BWS_REQUEST_TIMEOUT_SECONDS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_validate() {
        let config = ManagerConfig::new("0.client.secret:key", "org-1");
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_duration(), Duration::from_secs(900));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.name_normalization, NameNormalization::None);
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let config = ManagerConfig::new("  ", "")
            .with_endpoints("not a url", "https://api.example.com")
            .with_request_timeout(Duration::from_secs(0));

        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Access token cannot be empty"));
        assert!(message.contains("Organization ID cannot be empty"));
        assert!(message.contains("Identity URL must be a valid URL"));
        assert!(message.contains("Request timeout"));
        assert!(!message.contains("API URL"));
    }

    #[test]
    fn test_serialization_redacts_token() {
        let config = ManagerConfig::new("0.client.secret:key", "org-1")
            .with_name_normalization(NameNormalization::Lowercase);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("client.secret"));
        assert!(json.contains("\"name_normalization\":\"lowercase\""));
    }

    // All environment manipulation lives in one test to avoid races between tests.
    #[test]
    fn test_from_env() {
        clear_env();
        let err = ManagerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BWS_ACCESS_TOKEN"));

        env::set_var("BWS_ACCESS_TOKEN", "0.client.secret:key");
        env::set_var("BWS_ORGANIZATION_ID", "org-1");
        let config = ManagerConfig::from_env().unwrap();
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.cache_duration_seconds, DEFAULT_CACHE_DURATION_SECONDS);

        env::set_var("BWS_IDENTITY_URL", "http://127.0.0.1:9000");
        env::set_var("BWS_CACHE_DURATION_SECONDS", "60");
        env::set_var("BWS_NAME_NORMALIZATION", "Uppercase");
        let config = ManagerConfig::from_env().unwrap();
        assert_eq!(config.identity_url, "http://127.0.0.1:9000");
        assert_eq!(config.cache_duration(), Duration::from_secs(60));
        assert_eq!(config.name_normalization, NameNormalization::Uppercase);
        assert!(config.validate().is_ok());

        env::set_var("BWS_CACHE_DURATION_SECONDS", "soon");
        assert!(ManagerConfig::from_env().is_err());
        env::remove_var("BWS_CACHE_DURATION_SECONDS");

        env::set_var("BWS_NAME_NORMALIZATION", "titlecase");
        let err = ManagerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BWS_NAME_NORMALIZATION"));
        assert!(err.to_string().contains("titlecase"));

        clear_env();
    }
}
