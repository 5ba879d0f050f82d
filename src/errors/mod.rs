//! # Error Handling
//!
//! Crate-level error type. Secret resolution failures keep their own
//! [`SecretsError`] type; this wraps them together with configuration failures
//! for code that loads configuration and builds managers.

use crate::secrets::SecretsError;

/// Custom result type for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hemlis crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration loaded but failed validation rules
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Secret resolution errors
    #[error(transparent)]
    Secrets(#[from] SecretsError),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, messages.join(", "))
            })
            .collect();
        fields.sort();
        Self::validation(fields.join("; "))
    }
}
