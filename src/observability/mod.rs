//! # Observability Infrastructure
//!
//! Structured logging for the `hemlis` binary and embedders.

pub mod logging;

pub use logging::{init_logging, log_config_info};
