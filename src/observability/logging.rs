//! # Structured Logging
//!
//! Subscriber setup for binaries embedding a secret manager. The library only
//! emits `tracing` events; nothing is printed unless a subscriber is installed.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ManagerConfig;
use crate::errors::{Error, Result};

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. A subscriber that is
/// already installed (e.g. by a test harness) is left in place.
pub fn init_logging(default_level: &str, json: bool) -> Result<()> {
    let filter = build_filter(std::env::var("RUST_LOG").ok(), default_level)?;

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Keeping previously installed subscriber");
    }
    Ok(())
}

fn build_filter(directives: Option<String>, default_level: &str) -> Result<EnvFilter> {
    match directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(default_level),
    }
    .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))
}

/// Log the non-sensitive parts of a manager configuration.
pub fn log_config_info(config: &ManagerConfig) {
    tracing::info!(
        organization_id = %config.organization_id,
        identity_url = %config.identity_url,
        api_url = %config.api_url,
        cache_duration_secs = config.cache_duration_seconds,
        name_normalization = %config.name_normalization,
        request_timeout_secs = config.request_timeout_seconds,
        "Secret manager configuration"
    );
}
