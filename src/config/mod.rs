//! # Configuration Management
//!
//! Configuration for secret managers, loaded programmatically or from `BWS_*`
//! environment variables and checked with `validator` rules.

pub mod settings;

pub use settings::{
    ManagerConfig, DEFAULT_API_URL, DEFAULT_CACHE_DURATION_SECONDS, DEFAULT_IDENTITY_URL,
    DEFAULT_REQUEST_TIMEOUT_SECONDS,
};
