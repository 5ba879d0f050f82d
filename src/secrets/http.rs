//! HTTP secret source for a Bitwarden-compatible secrets REST API.
//!
//! Login exchanges a machine access token for a bearer token at the identity
//! service; listing and value fetches then go to the API service:
//!
//! - `POST {identity}/connect/token` (client credentials, scope `api.secrets`)
//! - `GET {api}/organizations/{org}/secrets`
//! - `GET {api}/secrets/{id}`
//!
//! Payloads are expected in plain JSON. Decrypting end-to-end encrypted
//! payloads is not done here.
//!
//! # Access tokens
//!
//! Tokens have the form `<version>.<client_id>.<client_secret>[:<encryption_key>]`.
//! Only the client id and secret are sent, and only to the identity service.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::error::{Result, SecretsError};
use super::source::SecretSource;
use super::types::{SecretDescriptor, SecretRecord, SecretString};
use crate::config::ManagerConfig;

const TOKEN_SCOPE: &str = "api.secrets";

/// Client id and secret extracted from a machine access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenParts {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl AccessTokenParts {
    /// Split a machine access token into its credentials.
    ///
    /// # Errors
    ///
    /// [`SecretsError::AuthenticationFailed`] if the token is not in
    /// `<version>.<client_id>.<client_secret>[:<key>]` form.
    pub fn parse(token: &SecretString) -> Result<Self> {
        let malformed = || SecretsError::authentication_failed("malformed access token");

        let credentials = match token.expose_secret().split_once(':') {
            Some((credentials, _encryption_key)) => credentials,
            None => token.expose_secret(),
        };

        let mut parts = credentials.splitn(3, '.');
        let version = parts.next().ok_or_else(malformed)?;
        let client_id = parts.next().ok_or_else(malformed)?;
        let client_secret = parts.next().ok_or_else(malformed)?;

        if version.is_empty() || client_id.is_empty() || client_secret.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: SecretString::new(client_secret),
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: SecretString,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct SecretListResponse {
    #[serde(default)]
    secrets: Vec<SecretDescriptor>,
}

/// [`SecretSource`] speaking HTTP to an identity service and a secrets API.
pub struct HttpSecretSource {
    client: Client,
    identity_url: Url,
    api_url: Url,
    bearer: RwLock<Option<SecretString>>,
}

impl HttpSecretSource {
    /// Create a source for the given endpoints.
    ///
    /// # Errors
    ///
    /// [`SecretsError::ConfigError`] if an endpoint is not a valid base URL or
    /// the HTTP client cannot be built.
    pub fn new(identity_url: &str, api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SecretsError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            identity_url: parse_base_url(identity_url, "identity")?,
            api_url: parse_base_url(api_url, "API")?,
            bearer: RwLock::new(None),
        })
    }

    /// Create a source from the endpoints and request timeout in `config`.
    pub fn from_config(config: &ManagerConfig) -> Result<Self> {
        Self::new(&config.identity_url, &config.api_url, config.request_timeout())
    }

    /// Returns true once a bearer token has been obtained.
    pub async fn is_authenticated(&self) -> bool {
        self.bearer.read().await.is_some()
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], subject: &str) -> Result<T> {
        let bearer = self
            .bearer
            .read()
            .await
            .clone()
            .ok_or_else(|| SecretsError::authentication_failed("not authenticated"))?;

        let url = join_segments(&self.api_url, segments);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(bearer.expose_secret())
            .send()
            .await
            .map_err(|e| SecretsError::connection_failed(e.to_string()))?;

        decode_response(response, subject).await
    }
}

#[async_trait]
impl SecretSource for HttpSecretSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn authenticate(&self, access_token: &SecretString) -> Result<()> {
        let parts = AccessTokenParts::parse(access_token)?;
        let url = join_segments(&self.identity_url, &["connect", "token"]);
        debug!(url = %url, client_id = %parts.client_id, "Exchanging access token");

        let form = [
            ("grant_type", "client_credentials"),
            ("scope", TOKEN_SCOPE),
            ("client_id", parts.client_id.as_str()),
            ("client_secret", parts.client_secret.expose_secret()),
        ];

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| SecretsError::connection_failed(e.to_string()))?;

        // OAuth token endpoints reject bad client credentials with 400
        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(SecretsError::authentication_failed(format!(
                "{}: {}",
                StatusCode::BAD_REQUEST,
                body.trim()
            )));
        }

        let token: TokenResponse = decode_response(response, &parts.client_id).await?;
        if token.access_token.is_empty() {
            return Err(SecretsError::authentication_failed("identity service returned no token"));
        }

        debug!(expires_in = ?token.expires_in, "Obtained bearer token");
        *self.bearer.write().await = Some(token.access_token);
        Ok(())
    }

    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>> {
        let listing: SecretListResponse = self
            .get_json(&["organizations", organization_id, "secrets"], organization_id)
            .await?;
        Ok(listing.secrets)
    }

    async fn get_secret(&self, id: &str) -> Result<SecretRecord> {
        self.get_json(&["secrets", id], id).await
    }
}

impl std::fmt::Debug for HttpSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSecretSource")
            .field("identity_url", &self.identity_url.as_str())
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

fn parse_base_url(raw: &str, which: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| SecretsError::config_error(format!("Invalid {} URL '{}': {}", which, raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(SecretsError::config_error(format!(
            "Invalid {} URL '{}': not a base URL",
            which, raw
        )));
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`, keeping any base path.
fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

async fn decode_response<T: DeserializeOwned>(response: Response, subject: &str) -> Result<T> {
    let status = response.status();
    debug!(status = %status, "Response status");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                SecretsError::authentication_failed(format!("{}: {}", status, body.trim()))
            }
            StatusCode::NOT_FOUND => SecretsError::not_found(subject),
            _ => SecretsError::backend_error(format!(
                "HTTP request failed with status {}: {}",
                status,
                body.trim()
            )),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| SecretsError::connection_failed(format!("Failed to read response body: {}", e)))?;

    serde_json::from_slice(&body).map_err(|e| SecretsError::invalid_response(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_access_token() {
        let parts = AccessTokenParts::parse(&SecretString::new("0.client-id.client-secret:a2V5"))
            .unwrap();
        assert_eq!(parts.client_id, "client-id");
        assert_eq!(parts.client_secret.expose_secret(), "client-secret");

        let no_key = AccessTokenParts::parse(&SecretString::new("0.id.se.cret")).unwrap();
        assert_eq!(no_key.client_secret.expose_secret(), "se.cret");
    }

    #[test]
    fn test_parse_access_token_rejects_malformed() {
        for token in ["", "token", "0.only-id", "0..secret", ".id.secret:key"] {
            let err = AccessTokenParts::parse(&SecretString::new(token)).unwrap_err();
            assert_eq!(err.to_string(), "authentication failed: malformed access token");
        }
    }

    #[test]
    fn test_join_segments_keeps_base_path() {
        let base = Url::parse("https://vault.example.com/api/").unwrap();
        let url = join_segments(&base, &["secrets", "a b"]);
        assert_eq!(url.as_str(), "https://vault.example.com/api/secrets/a%20b");

        let bare = Url::parse("https://api.example.com").unwrap();
        let url = join_segments(&bare, &["organizations", "org-1", "secrets"]);
        assert_eq!(url.as_str(), "https://api.example.com/organizations/org-1/secrets");
    }

    #[test]
    fn test_new_rejects_invalid_urls() {
        let err = HttpSecretSource::new("not a url", "https://api.example.com", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, SecretsError::ConfigError { .. }));

        let err =
            HttpSecretSource::new("https://id.example.com", "mailto:x@y", Duration::from_secs(5))
                .unwrap_err();
        assert!(err.to_string().contains("not a base URL"));
    }

    #[tokio::test]
    async fn test_requires_authentication_first() {
        let source = HttpSecretSource::new(
            "https://identity.example.com",
            "https://api.example.com",
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!source.is_authenticated().await);

        let err = source.list_secrets("org-1").await.unwrap_err();
        assert!(matches!(err, SecretsError::AuthenticationFailed { .. }));
    }
}
