//! Cached secret resolution in front of a remote secret service.
//!
//! # Architecture
//!
//! [`SecretManager`] composes three pieces over a [`SecretSource`]:
//!
//! - **Identifier index** ([`IdentifierIndex`]): normalized name → remote id,
//!   rebuilt wholesale from a full listing
//! - **Value cache** ([`ValueCache`]): remote id → value, filled lazily or by a
//!   full refresh
//! - **Name normalization** ([`NameNormalization`]): the one canonicalization
//!   rule applied to both declared keys and looked-up names
//!
//! ```text
//! get_secret_by_name ─► normalize ─► index ──miss──► rebuild index, retry once
//!                                      │
//!                                      ▼
//! get_secret_by_id ───────────────► value cache ──miss──► source.get_secret
//! ```
//!
//! # Sources
//!
//! - [`HttpSecretSource`]: Bitwarden-compatible secrets REST API
//! - [`EnvSecretSource`]: `HEMLIS_SECRET_*` environment variables (development)
//!
//! # Security Considerations
//!
//! - Values are held and returned as [`SecretString`] (redacted, zeroed on drop)
//! - Values and tokens never appear in log events or error messages
//! - Nothing is persisted; the caches live only as long as the manager

pub mod env;
pub mod error;
pub mod http;
pub mod index;
pub mod manager;
pub mod normalize;
pub mod source;
pub mod types;
pub mod value_cache;

pub use env::EnvSecretSource;
pub use error::{Result, SecretsError};
pub use http::{AccessTokenParts, HttpSecretSource};
pub use index::IdentifierIndex;
pub use manager::SecretManager;
pub use normalize::NameNormalization;
pub use source::SecretSource;
pub use types::{SecretDescriptor, SecretRecord, SecretString};
pub use value_cache::ValueCache;
