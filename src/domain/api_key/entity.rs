//! API key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageEntity, StorageKey};

/// API key identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create an ID from an existing string value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("key-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKeyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiKeyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ApiKeyId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for ApiKey {
    type Key = ApiKeyId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Status of an API key
///
/// Keys are never physically deleted in normal operation; revocation is a
/// soft status flip so the key's history stays attributable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyStatus {
    /// Key is active and can authenticate requests
    #[default]
    Active,
    /// Key has been revoked and can no longer authenticate
    Revoked,
}

impl ApiKeyStatus {
    /// Check if the key can authenticate requests
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ApiKeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Revoked => write!(f, "revoked"),
        }
    }
}

/// API key entity
///
/// The raw secret exists only at generation time; only its hash and a short
/// display preview are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Display name for the key
    name: String,
    /// Irreversible hash of the secret, format `sha256$<hex>`
    secret_hash: String,
    /// First characters of the raw secret plus a mask, for display only
    key_preview: String,
    /// Current status of the key
    status: ApiKeyStatus,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Last time the key successfully authenticated a request
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    /// Monotonic count of successful validations
    request_count: u64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new active API key
    pub fn new(
        id: ApiKeyId,
        name: impl Into<String>,
        secret_hash: impl Into<String>,
        key_preview: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            secret_hash: secret_hash.into(),
            key_preview: key_preview.into(),
            status: ApiKeyStatus::Active,
            expires_at: None,
            last_used_at: None,
            request_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn key_preview(&self) -> &str {
        &self.key_preview
    }

    pub fn status(&self) -> ApiKeyStatus {
        self.status
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Status checks

    /// Check if the key has passed its expiration date
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }

    /// Check if the key is currently usable for authentication
    pub fn is_valid(&self) -> bool {
        self.status.is_usable() && !self.is_expired()
    }

    // Mutators

    /// Record a successful validation: bumps `last_used_at` and the
    /// monotonic request counter by exactly one.
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
        self.request_count += 1;
    }

    /// Revoke the key
    pub fn revoke(&mut self) {
        self.status = ApiKeyStatus::Revoked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(name: &str) -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            name,
            "sha256$deadbeef",
            "spb_12345678***",
        )
    }

    #[test]
    fn test_api_key_id_generate_unique() {
        let a = ApiKeyId::generate();
        let b = ApiKeyId::generate();

        assert_ne!(a, b);
        assert!(a.as_str().starts_with("key-"));
    }

    #[test]
    fn test_api_key_status() {
        assert!(ApiKeyStatus::Active.is_usable());
        assert!(!ApiKeyStatus::Revoked.is_usable());
    }

    #[test]
    fn test_api_key_creation() {
        let key = create_test_key("Test Key");

        assert_eq!(key.name(), "Test Key");
        assert_eq!(key.key_preview(), "spb_12345678***");
        assert_eq!(key.request_count(), 0);
        assert!(key.last_used_at().is_none());
        assert!(key.is_valid());
        assert!(!key.is_expired());
    }

    #[test]
    fn test_api_key_expiration() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let key = create_test_key("Expired Key").with_expiration(past);

        assert!(key.is_expired());
        assert!(!key.is_valid());

        let future = Utc::now() + chrono::Duration::hours(1);
        let key = create_test_key("Fresh Key").with_expiration(future);

        assert!(!key.is_expired());
        assert!(key.is_valid());
    }

    #[test]
    fn test_api_key_revoke() {
        let mut key = create_test_key("Test Key");
        assert!(key.is_valid());

        key.revoke();
        assert_eq!(key.status(), ApiKeyStatus::Revoked);
        assert!(!key.is_valid());
    }

    #[test]
    fn test_api_key_record_usage() {
        let mut key = create_test_key("Test Key");

        key.record_usage();
        key.record_usage();

        assert_eq!(key.request_count(), 2);
        assert!(key.last_used_at().is_some());
    }
}
