//! API key service
//!
//! High-level key lifecycle and request authentication: generation (the
//! only moment the raw secret exists), validation, revocation, and the
//! per-key rate limit checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::api_key::{
    validate_key_name, ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus,
};
use crate::domain::{AuthErrorKind, DomainError};

use super::generator::ApiKeyGenerator;
use super::rate_limiter::{RateLimitDecision, RateLimiter};

/// Result of generating a new API key
#[derive(Debug)]
pub struct GeneratedKey {
    /// The persisted key entity (holds only hash and preview)
    pub api_key: ApiKey,
    /// The full secret; returned exactly once, never retrievable again
    pub secret: String,
}

/// Service for API key management and request authentication
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: ApiKeyGenerator,
    rate_limiter: Arc<RateLimiter>,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new service over a repository
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::default(),
            rate_limiter: Arc::new(RateLimiter::default()),
        }
    }

    /// Replace the generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the rate limiter
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Generate a new API key
    pub async fn generate(
        &self,
        name: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GeneratedKey, DomainError> {
        let name = name.into();
        validate_key_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;

        let generated = self.generator.generate();
        let mut api_key = ApiKey::new(
            ApiKeyId::generate(),
            &name,
            &generated.hash,
            &generated.preview,
        );

        if let Some(expires_at) = expires_at {
            api_key = api_key.with_expiration(expires_at);
        }

        let created = self.repository.create(api_key).await?;
        info!(key_id = %created.id(), name = %name, "API key generated");

        Ok(GeneratedKey {
            api_key: created,
            secret: generated.secret,
        })
    }

    /// Create an API key from a known secret
    ///
    /// Used for bootstrap seeding and deterministic tests.
    pub async fn generate_with_secret(
        &self,
        name: impl Into<String>,
        secret: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<GeneratedKey, DomainError> {
        let name = name.into();
        validate_key_name(&name).map_err(|e| DomainError::validation(e.to_string()))?;

        let generated = self.generator.from_secret(secret);
        let mut api_key = ApiKey::new(
            ApiKeyId::generate(),
            &name,
            &generated.hash,
            &generated.preview,
        );

        if let Some(expires_at) = expires_at {
            api_key = api_key.with_expiration(expires_at);
        }

        let created = self.repository.create(api_key).await?;
        info!(key_id = %created.id(), name = %name, "API key created from provided secret");

        Ok(GeneratedKey {
            api_key: created,
            secret: generated.secret,
        })
    }

    /// Authenticate a presented secret
    ///
    /// Scans every active key and verifies the presented secret's hash
    /// against each candidate with a full constant-time comparison. The
    /// scan is O(active keys) by design; there is no lookup index that
    /// could be derived from the hash.
    ///
    /// On success, the key's `last_used_at` and `request_count` are updated
    /// as an observable side effect.
    pub async fn validate(&self, presented: &str) -> Result<ApiKey, DomainError> {
        if presented.trim().is_empty() {
            return Err(DomainError::authentication(
                AuthErrorKind::MissingKey,
                "API key is required",
            ));
        }

        let active_keys = self.repository.list(Some(ApiKeyStatus::Active)).await?;

        for key in active_keys {
            if !self.generator.verify_secret(presented, key.secret_hash()) {
                continue;
            }

            // Hash matched; expiry is still checked so an expired key
            // fails even with valid material
            if key.is_expired() {
                debug!(key_id = %key.id(), "API key matched but has expired");
                return Err(DomainError::authentication(
                    AuthErrorKind::ExpiredKey,
                    format!("API key '{}' has expired", key.name()),
                ));
            }

            if let Err(e) = self.repository.record_usage(key.id()).await {
                warn!(key_id = %key.id(), error = %e, "Failed to record API key usage");
            }

            let mut key = key;
            key.record_usage();
            return Ok(key);
        }

        debug!("Presented API key matched no active key");
        Err(DomainError::authentication(
            AuthErrorKind::InvalidKey,
            "Invalid or expired API key",
        ))
    }

    /// Check and consume the key's rate limit quota
    pub fn check_rate_limit(&self, key_id: &ApiKeyId) -> RateLimitDecision {
        self.rate_limiter.check_and_increment(key_id.as_str())
    }

    /// Remaining quota in the key's current window
    pub fn rate_limit_remaining(&self, key_id: &ApiKeyId) -> u32 {
        self.rate_limiter.remaining(key_id.as_str())
    }

    /// Configured per-window request limit
    pub fn rate_limit(&self) -> u32 {
        self.rate_limiter.limit()
    }

    /// Clear the key's rate limit window (administrative override)
    pub fn reset_rate_limit(&self, key_id: &ApiKeyId) {
        self.rate_limiter.reset(key_id.as_str());
    }

    /// Get an API key by ID
    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// List API keys, optionally filtered by status
    pub async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list(status).await
    }

    /// Count API keys
    pub async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        self.repository.count(status).await
    }

    /// Revoke an API key (soft: the record is kept)
    pub async fn revoke(&self, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        let mut key = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        key.revoke();
        self.rate_limiter.reset(id.as_str());

        let updated = self.repository.update(&key).await?;
        info!(key_id = %id, "API key revoked");

        Ok(updated)
    }

    /// Permanently delete an API key
    ///
    /// Activity records referencing the key keep their `api_key_id` as a
    /// dangling weak reference.
    pub async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        self.rate_limiter.reset(id.as_str());

        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(key_id = %id, "API key deleted");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_key::rate_limiter::RateLimitConfig;
    use crate::infrastructure::api_key::StorageApiKeyRepository;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_service() -> ApiKeyService<StorageApiKeyRepository> {
        let storage = Arc::new(InMemoryStorage::<ApiKey>::new());
        let repository = Arc::new(StorageApiKeyRepository::new(storage));
        ApiKeyService::new(repository)
    }

    fn create_service_with_limit(limit: u32) -> ApiKeyService<StorageApiKeyRepository> {
        create_service().with_rate_limiter(Arc::new(RateLimiter::new(
            RateLimitConfig::default().with_limit(limit),
        )))
    }

    #[tokio::test]
    async fn test_generate_returns_secret_once() {
        let service = create_service();

        let generated = service.generate("Test Key", None).await.unwrap();

        assert!(generated.secret.starts_with("spb_"));
        assert_eq!(generated.api_key.name(), "Test Key");
        // The entity never carries the raw secret
        assert!(!generated.api_key.secret_hash().contains(&generated.secret));
        assert!(generated.api_key.key_preview().ends_with("***"));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_name() {
        let service = create_service();

        let result = service.generate("  ", None).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_validate_success_records_usage() {
        let service = create_service();
        let generated = service.generate("Test Key", None).await.unwrap();

        let validated = service.validate(&generated.secret).await.unwrap();
        assert_eq!(validated.name(), "Test Key");
        assert_eq!(validated.request_count(), 1);

        // Counter increments by exactly one per validation
        service.validate(&generated.secret).await.unwrap();
        let stored = service.get(generated.api_key.id()).await.unwrap().unwrap();
        assert_eq!(stored.request_count(), 2);
        assert!(stored.last_used_at().is_some());
    }

    #[tokio::test]
    async fn test_validate_missing_key() {
        let service = create_service();

        let result = service.validate("").await;
        assert!(matches!(
            result,
            Err(DomainError::Authentication {
                kind: AuthErrorKind::MissingKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_validate_unknown_key() {
        let service = create_service();
        service.generate("Test Key", None).await.unwrap();

        let result = service.validate("spb_not_a_real_secret").await;
        assert!(matches!(
            result,
            Err(DomainError::Authentication {
                kind: AuthErrorKind::InvalidKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_validate_revoked_key_fails_despite_hash_match() {
        let service = create_service();
        let generated = service.generate("Test Key", None).await.unwrap();

        service.revoke(generated.api_key.id()).await.unwrap();

        let result = service.validate(&generated.secret).await;
        assert!(matches!(
            result,
            Err(DomainError::Authentication {
                kind: AuthErrorKind::InvalidKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_validate_expired_key() {
        let service = create_service();
        let past = Utc::now() - chrono::Duration::hours(1);
        let generated = service.generate("Old Key", Some(past)).await.unwrap();

        let result = service.validate(&generated.secret).await;
        assert!(matches!(
            result,
            Err(DomainError::Authentication {
                kind: AuthErrorKind::ExpiredKey,
                ..
            })
        ));

        // Expiry rejection is not a usage
        let stored = service.get(generated.api_key.id()).await.unwrap().unwrap();
        assert_eq!(stored.request_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_picks_right_key_among_many() {
        let service = create_service();
        service.generate("Key A", None).await.unwrap();
        let b = service.generate("Key B", None).await.unwrap();
        service.generate("Key C", None).await.unwrap();

        let validated = service.validate(&b.secret).await.unwrap();
        assert_eq!(validated.name(), "Key B");
    }

    #[tokio::test]
    async fn test_rate_limit_enforced_per_key() {
        let service = create_service_with_limit(2);
        let a = service.generate("Key A", None).await.unwrap();
        let b = service.generate("Key B", None).await.unwrap();

        assert!(service.check_rate_limit(a.api_key.id()).allowed);
        assert!(service.check_rate_limit(a.api_key.id()).allowed);
        assert!(!service.check_rate_limit(a.api_key.id()).allowed);

        // Other keys keep their own window
        assert!(service.check_rate_limit(b.api_key.id()).allowed);
    }

    #[tokio::test]
    async fn test_reset_rate_limit() {
        let service = create_service_with_limit(1);
        let generated = service.generate("Key", None).await.unwrap();
        let id = generated.api_key.id();

        assert!(service.check_rate_limit(id).allowed);
        assert!(!service.check_rate_limit(id).allowed);

        service.reset_rate_limit(id);
        assert!(service.check_rate_limit(id).allowed);
    }

    #[tokio::test]
    async fn test_revoke_then_list_by_status() {
        let service = create_service();
        let a = service.generate("Key A", None).await.unwrap();
        service.generate("Key B", None).await.unwrap();

        service.revoke(a.api_key.id()).await.unwrap();

        let active = service.list(Some(ApiKeyStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name(), "Key B");

        let revoked = service.list(Some(ApiKeyStatus::Revoked)).await.unwrap();
        assert_eq!(revoked.len(), 1);
        assert_eq!(service.count(None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let generated = service.generate("Key", None).await.unwrap();

        assert!(service.delete(generated.api_key.id()).await.unwrap());
        assert!(service.get(generated.api_key.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_with_secret_is_deterministic() {
        let service = create_service();

        let generated = service
            .generate_with_secret("Bootstrap", "spb_bootstrap_secret_0001", None)
            .await
            .unwrap();

        assert_eq!(generated.secret, "spb_bootstrap_secret_0001");

        let validated = service.validate("spb_bootstrap_secret_0001").await.unwrap();
        assert_eq!(validated.name(), "Bootstrap");
    }
}
