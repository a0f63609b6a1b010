//! Application state for shared services
//!
//! Services are injected behind object-safe traits so handlers and tests
//! can substitute fakes; single instances are wired at process startup.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::activity::{ActivityFilter, ActivityRecord, ActivityRecordId, CreatedPageRecord, RequestContext};
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus};
use crate::domain::page::NewPage;
use crate::domain::DomainError;
use crate::infrastructure::activity::ActivityLogService;
use crate::infrastructure::api_key::{ApiKeyService, GeneratedKey, RateLimitDecision};
use crate::infrastructure::page::{BulkCreateOutcome, BulkPageService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub activity_service: Arc<dyn ActivityServiceTrait>,
    pub page_service: Arc<dyn BulkPageServiceTrait>,
    /// Master API switch from configuration
    pub api_enabled: bool,
    /// Shared token guarding the admin surface; `None` disables it
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        activity_service: Arc<dyn ActivityServiceTrait>,
        page_service: Arc<dyn BulkPageServiceTrait>,
        api_enabled: bool,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            api_key_service,
            activity_service,
            page_service,
            api_enabled,
            admin_token,
        }
    }
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn validate(&self, presented: &str) -> Result<ApiKey, DomainError>;
    async fn generate(
        &self,
        name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GeneratedKey, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<ApiKey>, DomainError>;
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;
    async fn revoke(&self, id: &str) -> Result<ApiKey, DomainError>;
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
    fn check_rate_limit(&self, id: &str) -> RateLimitDecision;
    fn rate_limit_remaining(&self, id: &str) -> u32;
    fn rate_limit(&self) -> u32;
    fn reset_rate_limit(&self, id: &str);
}

/// Trait for activity trail operations
#[async_trait::async_trait]
pub trait ActivityServiceTrait: Send + Sync {
    async fn log_request(&self, record: ActivityRecord) -> Result<ActivityRecordId, DomainError>;
    async fn records(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, DomainError>;
    async fn created_pages(&self) -> Result<Vec<CreatedPageRecord>, DomainError>;
}

/// Trait for the bulk creation entry point
#[async_trait::async_trait]
pub trait BulkPageServiceTrait: Send + Sync {
    async fn create_pages(
        &self,
        api_key: &ApiKey,
        items: Vec<NewPage>,
        context: &RequestContext,
    ) -> Result<BulkCreateOutcome, DomainError>;
}

// Implement the traits for the actual services

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn validate(&self, presented: &str) -> Result<ApiKey, DomainError> {
        ApiKeyService::validate(self, presented).await
    }

    async fn generate(
        &self,
        name: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GeneratedKey, DomainError> {
        ApiKeyService::generate(self, name, expires_at).await
    }

    async fn get(&self, id: &str) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::get(self, &ApiKeyId::from(id)).await
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self, None::<ApiKeyStatus>).await
    }

    async fn revoke(&self, id: &str) -> Result<ApiKey, DomainError> {
        ApiKeyService::revoke(self, &ApiKeyId::from(id)).await
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        ApiKeyService::delete(self, &ApiKeyId::from(id)).await
    }

    fn check_rate_limit(&self, id: &str) -> RateLimitDecision {
        ApiKeyService::check_rate_limit(self, &ApiKeyId::from(id))
    }

    fn rate_limit_remaining(&self, id: &str) -> u32 {
        ApiKeyService::rate_limit_remaining(self, &ApiKeyId::from(id))
    }

    fn rate_limit(&self) -> u32 {
        ApiKeyService::rate_limit(self)
    }

    fn reset_rate_limit(&self, id: &str) {
        ApiKeyService::reset_rate_limit(self, &ApiKeyId::from(id))
    }
}

#[async_trait::async_trait]
impl ActivityServiceTrait for ActivityLogService {
    async fn log_request(&self, record: ActivityRecord) -> Result<ActivityRecordId, DomainError> {
        ActivityLogService::log_request(self, record).await
    }

    async fn records(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, DomainError> {
        ActivityLogService::records(self, filter).await
    }

    async fn created_pages(&self) -> Result<Vec<CreatedPageRecord>, DomainError> {
        ActivityLogService::created_pages(self).await
    }
}

#[async_trait::async_trait]
impl BulkPageServiceTrait for BulkPageService {
    async fn create_pages(
        &self,
        api_key: &ApiKey,
        items: Vec<NewPage>,
        context: &RequestContext,
    ) -> Result<BulkCreateOutcome, DomainError> {
        BulkPageService::create_pages(self, api_key, items, context).await
    }
}
