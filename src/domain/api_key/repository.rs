//! API key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId, ApiKeyStatus};
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// List all API keys (optionally filtered by status), newest first
    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError>;

    /// Count API keys (optionally filtered by status)
    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        Ok(self.list(status).await?.len())
    }

    /// Record usage of an API key: bump `last_used_at` and the request
    /// counter by exactly one. Concurrent calls must not lose increments.
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}
