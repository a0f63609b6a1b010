//! In-memory storage implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory storage
///
/// Used for development and tests. Data is lost when the process exits.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self
            .entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entities.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self
            .entities
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entities.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        if !entities.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            )));
        }

        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(entities.remove(key.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::{ApiKey, ApiKeyId};

    fn test_key(id: &str) -> ApiKey {
        ApiKey::new(ApiKeyId::new(id), "Test Key", "sha256$hash", "spb_1234***")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let storage: InMemoryStorage<ApiKey> = InMemoryStorage::new();
        let key = test_key("key-1");

        storage.create(key.clone()).await.unwrap();

        let found = storage.get(key.id()).await.unwrap();
        assert_eq!(found.unwrap().name(), "Test Key");
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let storage: InMemoryStorage<ApiKey> = InMemoryStorage::new();

        storage.create(test_key("key-1")).await.unwrap();
        let result = storage.create(test_key("key-1")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let storage: InMemoryStorage<ApiKey> = InMemoryStorage::new();

        let result = storage.update(test_key("key-1")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let storage: InMemoryStorage<ApiKey> = InMemoryStorage::new();
        let key = test_key("key-1");

        storage.create(key.clone()).await.unwrap();
        assert!(storage.delete(key.id()).await.unwrap());
        assert!(!storage.delete(key.id()).await.unwrap());
        assert!(storage.get(key.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let storage: InMemoryStorage<ApiKey> = InMemoryStorage::new();

        storage.create(test_key("key-1")).await.unwrap();
        storage.create(test_key("key-2")).await.unwrap();

        assert_eq!(storage.list().await.unwrap().len(), 2);
        assert_eq!(storage.count().await.unwrap(), 2);
        assert!(storage.exists(&ApiKeyId::new("key-1")).await.unwrap());
    }
}
