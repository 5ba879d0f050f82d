//! Error types for secret resolution and caching.

use thiserror::Error;

/// Result type for secrets operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while resolving secrets through the manager or a source.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// A secret name (or id, at the source level) could not be resolved.
    ///
    /// At the manager level `key` is the name exactly as the caller supplied it,
    /// before normalization.
    #[error("secret '{key}' not found")]
    NotFound { key: String },

    /// The manager could not be constructed.
    #[error("{message}: {source}")]
    Construction {
        message: String,
        #[source]
        source: Box<SecretsError>,
    },

    /// Rebuilding the identifier index failed; the previous index is still installed.
    #[error("failed to refresh identifier index: {source}")]
    IndexRefresh {
        #[source]
        source: Box<SecretsError>,
    },

    /// A call to the remote secret source failed.
    #[error("failed to {operation} '{subject}': {source}")]
    RemoteCall {
        operation: &'static str,
        subject: String,
        #[source]
        source: Box<SecretsError>,
    },

    /// Authentication with the secret source failed.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Failed to reach the secret source.
    #[error("backend connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The secret source answered with an error.
    #[error("backend error: {message}")]
    BackendError { message: String },

    /// The secret source answered with a payload that could not be decoded.
    #[error("invalid response from backend: {message}")]
    InvalidResponse { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    ConfigError { message: String },
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Wrap a failure that prevented the manager from being built.
    pub fn construction(message: impl Into<String>, source: SecretsError) -> Self {
        Self::Construction { message: message.into(), source: Box::new(source) }
    }

    /// Wrap a failure that aborted an identifier index rebuild.
    pub fn index_refresh(source: SecretsError) -> Self {
        Self::IndexRefresh { source: Box::new(source) }
    }

    /// Wrap a failed call to the remote source, naming the operation and its subject.
    pub fn remote_call(
        operation: &'static str,
        subject: impl Into<String>,
        source: SecretsError,
    ) -> Self {
        Self::RemoteCall { operation, subject: subject.into(), source: Box::new(source) }
    }

    /// Create an authentication failed error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into() }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }

    /// Create a backend error.
    pub fn backend_error(message: impl Into<String>) -> Self {
        Self::BackendError { message: message.into() }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Create a config error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    /// Returns true when this is a name-resolution miss at the manager level.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Walks wrapping variants down to the error reported by the source.
    pub fn root_cause(&self) -> &SecretsError {
        match self {
            Self::Construction { source, .. }
            | Self::IndexRefresh { source }
            | Self::RemoteCall { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
