//! API key domain
//!
//! Domain types and traits for API key management: the key entity with its
//! hashed secret and usage counters, the repository trait, and attribute
//! validation.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiKey, ApiKeyId, ApiKeyStatus};
pub use repository::ApiKeyRepository;
pub use validation::{validate_key_name, ApiKeyValidationError};
