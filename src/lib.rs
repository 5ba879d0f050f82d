//! # Hemlis
//!
//! Concurrency-safe in-memory caching in front of a remote secret service.
//! Human-readable secret names are resolved to remote identifiers, and
//! identifiers to values, with as few round trips as possible.
//!
//! ## Architecture
//!
//! ```text
//! caller ─► SecretManager ─► IdentifierIndex (name → id)
//!                │
//!                └────────► ValueCache (id → value) ─► SecretSource (HTTP / env)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hemlis::{ManagerConfig, NameNormalization, SecretManager};
//!
//! # async fn run() -> hemlis::Result<()> {
//! let config = ManagerConfig::from_env()?.with_name_normalization(NameNormalization::Lowercase);
//! let manager = SecretManager::new(config).await?;
//!
//! let secret = manager.get_secret_by_name("My-Secret").await?;
//! assert!(!secret.expose_secret().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::ManagerConfig;
pub use errors::{Error, Result};
pub use secrets::{
    EnvSecretSource, HttpSecretSource, NameNormalization, SecretManager, SecretSource,
    SecretString, SecretsError,
};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
