//! Environment variable secret source.
//!
//! Intended for **local development and tests only**. Every variable carrying
//! the prefix (default `HEMLIS_SECRET_`) is one secret: its full variable name
//! is the id and the remainder after the prefix is the declared name.
//!
//! ```bash
//! export HEMLIS_SECRET_DB_PASS="local-password"
//! hemlis --source env --normalization lowercase get db_pass
//! ```
//!
//! Environment variables are visible in process listings and shell history;
//! use a real secret service for anything else.

use async_trait::async_trait;
use std::env::{self, VarError};

use super::error::{Result, SecretsError};
use super::source::SecretSource;
use super::types::{SecretDescriptor, SecretRecord, SecretString};

/// Default environment variable prefix for secrets.
pub const DEFAULT_SECRET_PREFIX: &str = "HEMLIS_SECRET_";

/// Read-only [`SecretSource`] backed by the process environment.
#[derive(Debug, Clone)]
pub struct EnvSecretSource {
    prefix: String,
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_SECRET_PREFIX)
    }
}

impl EnvSecretSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    fn name(&self) -> &str {
        "env"
    }

    async fn authenticate(&self, _access_token: &SecretString) -> Result<()> {
        Ok(())
    }

    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>> {
        let mut descriptors: Vec<SecretDescriptor> = env::vars_os()
            .filter_map(|(var, _)| {
                // Non-UTF-8 names can never carry the prefix
                let var = var.into_string().ok()?;
                let key = var.strip_prefix(&self.prefix)?;
                if key.is_empty() {
                    return None;
                }
                Some(SecretDescriptor::new(var.clone(), organization_id, key))
            })
            .collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(descriptors)
    }

    async fn get_secret(&self, id: &str) -> Result<SecretRecord> {
        let key = id
            .strip_prefix(&self.prefix)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SecretsError::not_found(id))?;

        let value = env::var(id).map_err(|e| match e {
            VarError::NotPresent => SecretsError::not_found(id),
            VarError::NotUnicode(_) => {
                SecretsError::invalid_response(format!("value of '{}' is not valid UTF-8", id))
            }
        })?;

        Ok(SecretRecord::from_descriptor(SecretDescriptor::new(id, "", key), value))
    }
}
