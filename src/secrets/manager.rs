//! Secret manager: name and id lookups over two independently locked caches.
//!
//! # Caches
//!
//! - [`IdentifierIndex`]: normalized name → remote id. Built once during
//!   construction, rebuilt wholesale on demand or when a name lookup misses.
//! - [`ValueCache`]: remote id → value. Filled lazily by id lookups, replaced
//!   wholesale by [`SecretManager::refresh_cache`], emptied by
//!   [`SecretManager::clear_cache`].
//!
//! # Locking
//!
//! Each cache has its own reader/writer lock. Remote calls are always made with
//! no lock held; replacements are built off to the side and only the swap takes
//! the write lock. Two concurrent misses for the same id may both fetch and both
//! insert. Values are treated as immutable for the life of the cache, so the
//! duplicate fetch is wasted work but never wrong.
//!
//! # Example
//!
//! ```rust,ignore
//! use hemlis::{ManagerConfig, SecretManager};
//!
//! let config = ManagerConfig::from_env()?;
//! let manager = SecretManager::new(config).await?;
//!
//! let password = manager.get_secret_by_name("db-pass").await?;
//! connect(password.expose_secret()).await?;
//! ```

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::{Result, SecretsError};
use super::http::HttpSecretSource;
use super::index::IdentifierIndex;
use super::normalize::NameNormalization;
use super::source::SecretSource;
use super::types::{SecretDescriptor, SecretString};
use super::value_cache::ValueCache;
use crate::config::ManagerConfig;

const LIST_OPERATION: &str = "list secrets for organization";
const GET_OPERATION: &str = "get secret";

/// Caching façade in front of a [`SecretSource`].
///
/// All state is owned by the instance; any number of independently configured
/// managers can live in one process. Share one manager between tasks with an
/// `Arc`.
pub struct SecretManager<S: SecretSource> {
    source: S,
    organization_id: String,
    cache_duration: Duration,
    index: IdentifierIndex,
    values: ValueCache,
}

impl SecretManager<HttpSecretSource> {
    /// Build a manager backed by the HTTP secret service named in `config`.
    ///
    /// # Errors
    ///
    /// [`SecretsError::Construction`] if the HTTP client cannot be created, the
    /// access token is rejected, or the initial identifier index cannot be built.
    pub async fn new(config: ManagerConfig) -> Result<Self> {
        let source = HttpSecretSource::from_config(&config)
            .map_err(|e| SecretsError::construction("failed to create secrets client", e))?;
        Self::with_source(config, source).await
    }
}

impl<S: SecretSource> SecretManager<S> {
    /// Build a manager over an arbitrary source.
    ///
    /// Validates `config`, logs in with the access token, then builds the
    /// identifier index once. No manager is returned unless all three succeed.
    pub async fn with_source(config: ManagerConfig, source: S) -> Result<Self> {
        config.validate().map_err(|e| {
            SecretsError::construction(
                "invalid manager configuration",
                SecretsError::config_error(e.to_string()),
            )
        })?;

        source
            .authenticate(&config.access_token)
            .await
            .map_err(|e| SecretsError::construction("failed to login with access token", e))?;

        let manager = Self {
            source,
            organization_id: config.organization_id,
            cache_duration: Duration::from_secs(config.cache_duration_seconds),
            index: IdentifierIndex::new(config.name_normalization),
            values: ValueCache::new(),
        };

        manager
            .rebuild_index()
            .await
            .map_err(|e| SecretsError::construction("failed to build identifier index", e))?;

        debug!(
            source = manager.source.name(),
            organization_id = %manager.organization_id,
            normalization = %manager.index.normalization(),
            "Secret manager ready"
        );
        Ok(manager)
    }

    /// Resolve `name` to an id through the index, then return its value.
    ///
    /// A name missing from the index triggers exactly one index rebuild and one
    /// retry, so secrets created after the last build are found without looping.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::NotFound`] carrying `name` as supplied if it is still
    ///   unknown after the rebuild
    /// - [`SecretsError::IndexRefresh`] if the rebuild fails
    /// - [`SecretsError::RemoteCall`] if the value fetch fails
    #[instrument(level = "debug", skip(self))]
    pub async fn get_secret_by_name(&self, name: &str) -> Result<SecretString> {
        let id = match self.index.lookup(name).await {
            Some(id) => id,
            None => {
                debug!("Secret name not indexed, rebuilding identifier index");
                self.refresh_index().await?;
                self.index.lookup(name).await.ok_or_else(|| SecretsError::not_found(name))?
            }
        };

        self.get_secret_by_id(&id).await
    }

    /// Return the value for a remote id, fetching and caching it on a miss.
    ///
    /// Ids are not checked against the identifier index.
    ///
    /// # Errors
    ///
    /// [`SecretsError::RemoteCall`] if the fetch fails; nothing is cached then.
    pub async fn get_secret_by_id(&self, id: &str) -> Result<SecretString> {
        if let Some(value) = self.values.get(id).await {
            debug!(id = %id, "Cache hit for secret");
            return Ok(value);
        }

        debug!(id = %id, "Cache miss, fetching secret from source");
        let record = self
            .source
            .get_secret(id)
            .await
            .map_err(|e| SecretsError::remote_call(GET_OPERATION, id, e))?;

        let value = record.value;
        self.values.insert(id, value.clone()).await;
        Ok(value)
    }

    /// Rebuild the identifier index from a full listing.
    ///
    /// On failure the previous index stays installed. Returns the number of
    /// indexed names.
    #[instrument(level = "debug", skip(self), fields(organization_id = %self.organization_id))]
    pub async fn refresh_index(&self) -> Result<usize> {
        self.rebuild_index().await.map_err(SecretsError::index_refresh)
    }

    /// Reload every value in the organization and replace the value cache.
    ///
    /// Any listing or fetch failure aborts the refresh and leaves the previous
    /// cache in place. The identifier index is not touched. Returns the number
    /// of cached values.
    #[instrument(level = "debug", skip(self), fields(organization_id = %self.organization_id))]
    pub async fn refresh_cache(&self) -> Result<usize> {
        let descriptors = self.list_descriptors().await?;

        let mut fresh = HashMap::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let record = self
                .source
                .get_secret(&descriptor.id)
                .await
                .map_err(|e| SecretsError::remote_call(GET_OPERATION, &descriptor.id, e))?;
            fresh.insert(descriptor.id.clone(), record.value);
        }

        let count = fresh.len();
        self.values.replace(fresh).await;
        Ok(count)
    }

    /// Drop every cached value. The identifier index is kept.
    pub async fn clear_cache(&self) {
        self.values.clear().await;
    }

    /// The configured cache duration. Reported only; entries do not expire.
    pub fn cache_duration(&self) -> Duration {
        self.cache_duration
    }

    pub fn normalization(&self) -> NameNormalization {
        self.index.normalization()
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of values currently cached.
    pub async fn cached_len(&self) -> usize {
        self.values.len().await
    }

    /// Number of names currently indexed.
    pub async fn indexed_len(&self) -> usize {
        self.index.len().await
    }

    /// Normalized names currently indexed, sorted.
    pub async fn indexed_names(&self) -> Vec<String> {
        self.index.names().await
    }

    async fn rebuild_index(&self) -> Result<usize> {
        let descriptors = self.list_descriptors().await?;
        let fresh = IdentifierIndex::build(self.index.normalization(), &descriptors);
        let count = fresh.len();
        self.index.replace(fresh).await;
        Ok(count)
    }

    async fn list_descriptors(&self) -> Result<Vec<SecretDescriptor>> {
        self.source
            .list_secrets(&self.organization_id)
            .await
            .map_err(|e| SecretsError::remote_call(LIST_OPERATION, &self.organization_id, e))
    }
}

impl<S: SecretSource> std::fmt::Debug for SecretManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManager")
            .field("source", &self.source.name())
            .field("organization_id", &self.organization_id)
            .field("cache_duration", &self.cache_duration)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
