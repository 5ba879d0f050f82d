//! The remote secret source contract consumed by the manager.

use async_trait::async_trait;
use std::sync::Arc;

use super::error::Result;
use super::types::{SecretDescriptor, SecretRecord, SecretString};

/// A remote secret-storage service.
///
/// The manager only needs three capabilities from it: a one-time token login, a
/// listing of every secret descriptor in an organization, and a value fetch by id.
/// Transport, wire format and timeouts are the implementation's business.
///
/// # Errors
///
/// Implementations report their own failures using the collaborator-level
/// variants of [`SecretsError`](super::SecretsError) (`AuthenticationFailed`,
/// `ConnectionFailed`, `BackendError`, `InvalidResponse`, `NotFound`). The
/// manager adds the operation context.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Log in with an access token. Called once, before any other call.
    async fn authenticate(&self, access_token: &SecretString) -> Result<()>;

    /// List every secret descriptor belonging to `organization_id`, in remote order.
    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>>;

    /// Fetch one secret, including its value, by remote identifier.
    async fn get_secret(&self, id: &str) -> Result<SecretRecord>;
}

#[async_trait]
impl<T: SecretSource + ?Sized> SecretSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn authenticate(&self, access_token: &SecretString) -> Result<()> {
        (**self).authenticate(access_token).await
    }

    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>> {
        (**self).list_secrets(organization_id).await
    }

    async fn get_secret(&self, id: &str) -> Result<SecretRecord> {
        (**self).get_secret(id).await
    }
}

#[async_trait]
impl<T: SecretSource + ?Sized> SecretSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn authenticate(&self, access_token: &SecretString) -> Result<()> {
        (**self).authenticate(access_token).await
    }

    async fn list_secrets(&self, organization_id: &str) -> Result<Vec<SecretDescriptor>> {
        (**self).list_secrets(organization_id).await
    }

    async fn get_secret(&self, id: &str) -> Result<SecretRecord> {
        (**self).get_secret(id).await
    }
}
