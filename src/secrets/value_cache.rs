//! Value cache: remote identifier to secret value.
//!
//! Grows one entry at a time on lazy fetches and is otherwise replaced or
//! emptied as a whole. Values never leave the cache except as cloned
//! [`SecretString`]s.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::SecretString;

#[derive(Default)]
pub struct ValueCache {
    entries: RwLock<HashMap<String, SecretString>>,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<SecretString> {
        self.entries.read().await.get(id).cloned()
    }

    /// Insert or overwrite one entry.
    pub async fn insert(&self, id: impl Into<String>, value: SecretString) {
        self.entries.write().await.insert(id.into(), value);
    }

    /// Install `fresh` as the whole cache.
    ///
    /// The replaced values are zeroed after the write lock is released.
    pub async fn replace(&self, fresh: HashMap<String, SecretString>) {
        let count = fresh.len();
        let previous = {
            let mut entries = self.entries.write().await;
            std::mem::replace(&mut *entries, fresh)
        };
        debug!(entries = count, replaced = previous.len(), "Replaced secret value cache");
    }

    /// Empty the cache.
    pub async fn clear(&self) {
        let previous = std::mem::take(&mut *self.entries.write().await);
        debug!(cleared = previous.len(), "Cleared secret value cache");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl std::fmt::Debug for ValueCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCache").finish_non_exhaustive()
    }
}
