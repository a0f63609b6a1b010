//! API key infrastructure: secret generation, authentication, rate
//! limiting, and storage-backed persistence.

mod generator;
pub mod rate_limiter;
mod service;
mod storage_repository;

pub use generator::{ApiKeyGenerator, GeneratedSecret};
pub use rate_limiter::{FailurePolicy, RateLimitConfig, RateLimitDecision, RateLimiter};
pub use service::{ApiKeyService, GeneratedKey};
pub use storage_repository::StorageApiKeyRepository;
