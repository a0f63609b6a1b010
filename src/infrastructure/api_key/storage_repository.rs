//! Storage-backed API key repository

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// `ApiKeyRepository` over a generic storage backend
#[derive(Debug)]
pub struct StorageApiKeyRepository {
    storage: Arc<dyn Storage<ApiKey>>,
    /// Serializes usage-counter read-modify-write cycles so concurrent
    /// validations of the same key never lose an increment
    usage_lock: Mutex<()>,
}

impl StorageApiKeyRepository {
    pub fn new(storage: Arc<dyn Storage<ApiKey>>) -> Self {
        Self {
            storage,
            usage_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for StorageApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.storage.get(id).await
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        self.storage.create(api_key).await
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        self.storage.update(api_key.clone()).await
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        let mut keys: Vec<ApiKey> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|k| status.is_none_or(|s| k.status() == s))
            .collect();

        keys.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(keys)
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let _guard = self.usage_lock.lock().await;

        let mut key = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        key.record_usage();
        self.storage.update(key).await?;

        Ok(())
    }
}
