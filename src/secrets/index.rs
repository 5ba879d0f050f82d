//! Identifier index: normalized secret name to remote identifier.
//!
//! The index is only ever replaced as a whole. A fresh map is built from a full
//! listing without holding any lock, then swapped in under the write lock, so
//! readers see either the previous index or the new one, never a partial build.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::normalize::NameNormalization;
use super::types::SecretDescriptor;

pub struct IdentifierIndex {
    normalization: NameNormalization,
    entries: RwLock<HashMap<String, String>>,
}

impl IdentifierIndex {
    /// Create an unbuilt (empty) index using `normalization` for its whole lifetime.
    pub fn new(normalization: NameNormalization) -> Self {
        Self { normalization, entries: RwLock::new(HashMap::new()) }
    }

    pub fn normalization(&self) -> NameNormalization {
        self.normalization
    }

    /// Build a name-to-id map from a listing.
    ///
    /// Declared keys are normalized with `normalization`. When two descriptors
    /// normalize to the same name the later one in listing order wins.
    pub fn build(
        normalization: NameNormalization,
        descriptors: &[SecretDescriptor],
    ) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let name = normalization.apply(&descriptor.key).into_owned();
            if let Some(previous) = map.insert(name, descriptor.id.clone()) {
                debug!(
                    previous_id = %previous,
                    id = %descriptor.id,
                    "Duplicate normalized secret name, keeping the later identifier"
                );
            }
        }
        map
    }

    /// Resolve a caller-supplied name, normalizing it first.
    pub async fn lookup(&self, name: &str) -> Option<String> {
        let normalized = self.normalization.apply(name);
        let entries = self.entries.read().await;
        entries.get(normalized.as_ref()).cloned()
    }

    /// Install `fresh` as the whole index.
    pub async fn replace(&self, fresh: HashMap<String, String>) {
        let count = fresh.len();
        let previous = {
            let mut entries = self.entries.write().await;
            std::mem::replace(&mut *entries, fresh)
        };
        debug!(entries = count, replaced = previous.len(), "Installed identifier index");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// The normalized names currently indexed, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for IdentifierIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierIndex").field("normalization", &self.normalization).finish()
    }
}
