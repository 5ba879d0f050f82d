//! Shared test infrastructure: an in-memory secret source that counts calls
//! and can be told to fail.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hemlis::secrets::{
    Result, SecretDescriptor, SecretRecord, SecretSource, SecretString, SecretsError,
};
use hemlis::{ManagerConfig, NameNormalization, SecretManager};

pub const ORG_ID: &str = "org-1";
pub const ACCESS_TOKEN: &str = "0.client-id.client-secret:a2V5";

/// In-memory [`SecretSource`] with call counters and failure injection.
#[derive(Default)]
pub struct MockSecretSource {
    descriptors: Mutex<Vec<SecretDescriptor>>,
    values: Mutex<HashMap<String, String>>,
    failing_ids: Mutex<HashSet<String>>,
    fail_listing: AtomicBool,
    reject_token: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
    list_delay: Mutex<Option<Duration>>,
    auth_calls: AtomicUsize,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    get_calls_by_id: Mutex<HashMap<String, usize>>,
}

impl MockSecretSource {
    /// Create a source listing `(id, key, value)` triples in the given order.
    pub fn with_secrets(secrets: &[(&str, &str, &str)]) -> Arc<Self> {
        let source = Self::default();
        for (id, key, value) in secrets {
            source.add_secret(id, key, value);
        }
        Arc::new(source)
    }

    /// Add a listed secret (as if created remotely).
    pub fn add_secret(&self, id: &str, key: &str, value: &str) {
        self.descriptors.lock().unwrap().push(SecretDescriptor::new(id, ORG_ID, key));
        self.set_value(id, value);
    }

    /// Remove a secret from the listing; its value stays fetchable by id.
    pub fn unlist(&self, id: &str) {
        self.descriptors.lock().unwrap().retain(|d| d.id != id);
    }

    /// Make a value fetchable by id without listing it.
    pub fn set_value(&self, id: &str, value: &str) {
        self.values.lock().unwrap().insert(id.to_string(), value.to_string());
    }

    pub fn fail_get(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn restore_get(&self, id: &str) {
        self.failing_ids.lock().unwrap().remove(id);
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    pub fn reject_token(&self, reject: bool) {
        self.reject_token.store(reject, Ordering::SeqCst);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls_for(&self, id: &str) -> usize {
        self.get_calls_by_id.lock().unwrap().get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl SecretSource for MockSecretSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn authenticate(&self, access_token: &SecretString) -> Result<()> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_token.load(Ordering::SeqCst) || access_token.expose_secret() != ACCESS_TOKEN
        {
            return Err(SecretsError::authentication_failed("invalid_client"));
        }
        Ok(())
    }

    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(SecretsError::connection_failed("listing unavailable"));
        }
        Ok(self
            .descriptors
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn get_secret(&self, id: &str) -> Result<SecretRecord> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        *self.get_calls_by_id.lock().unwrap().entry(id.to_string()).or_insert(0) += 1;

        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_ids.lock().unwrap().contains(id) {
            return Err(SecretsError::backend_error(format!("simulated failure for {}", id)));
        }

        let value = self
            .values
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| SecretsError::not_found(id))?;
        Ok(SecretRecord::from_descriptor(SecretDescriptor::new(id, ORG_ID, id), value))
    }
}

pub fn config(normalization: NameNormalization) -> ManagerConfig {
    ManagerConfig::new(ACCESS_TOKEN, ORG_ID).with_name_normalization(normalization)
}

pub async fn manager(
    source: &Arc<MockSecretSource>,
    normalization: NameNormalization,
) -> SecretManager<Arc<MockSecretSource>> {
    SecretManager::with_source(config(normalization), Arc::clone(source))
        .await
        .expect("manager should build against the mock source")
}
