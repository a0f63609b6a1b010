//! Activity trail entities
//!
//! Two append-only record types: one `ActivityRecord` per inbound request
//! and one `CreatedPageRecord` per page the request produced. Records are
//! immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::api_key::ApiKeyId;
use crate::domain::storage::{StorageEntity, StorageKey};

/// Unique identifier for an activity record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityRecordId(String);

impl ActivityRecordId {
    /// Create an ID from an existing string value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("log-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivityRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ActivityRecordId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for ActivityRecord {
    type Key = ActivityRecordId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Unique identifier for a created-page record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreatedPageRecordId(String);

impl CreatedPageRecordId {
    /// Create an ID from an existing string value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("page-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CreatedPageRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for CreatedPageRecordId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for CreatedPageRecord {
    type Key = CreatedPageRecordId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// Terminal outcome of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The request was processed (individual items may still have failed)
    Success,
    /// The request was rejected before any page could be created
    Failed,
}

impl std::fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Request metadata captured at the HTTP boundary and threaded through to
/// the activity trail.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request path, e.g. `/pagebuilder/v1/create-pages`
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Best-effort client IP (forwarded headers first)
    pub client_ip: Option<String>,
    /// Caller's user agent
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            client_ip: None,
            user_agent: None,
        }
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// One record per inbound request, written once the request reaches a
/// terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique ID
    id: ActivityRecordId,
    /// Key that made the request; weak reference, absent when the request
    /// never authenticated
    pub api_key_id: Option<ApiKeyId>,
    /// Request path
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Terminal outcome
    pub outcome: RequestOutcome,
    /// Number of pages created by the request
    pub pages_created: u32,
    /// Wall-clock handling time in milliseconds
    pub duration_ms: u64,
    /// Client IP, when determinable
    pub client_ip: Option<String>,
    /// Client user agent
    pub user_agent: Option<String>,
    /// Opaque diagnostic summary of the request
    pub request_summary: serde_json::Value,
    /// Opaque diagnostic summary of the response
    pub response_summary: serde_json::Value,
    /// Error message for failed requests
    pub error_message: Option<String>,
    /// Timestamp the record was written
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Create a new record for a request reaching a terminal state
    pub fn new(context: &RequestContext, outcome: RequestOutcome) -> Self {
        Self {
            id: ActivityRecordId::generate(),
            api_key_id: None,
            endpoint: context.endpoint.clone(),
            method: context.method.clone(),
            outcome,
            pages_created: 0,
            duration_ms: 0,
            client_ip: context.client_ip.clone(),
            user_agent: context.user_agent.clone(),
            request_summary: serde_json::Value::Null,
            response_summary: serde_json::Value::Null,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &ActivityRecordId {
        &self.id
    }

    pub fn with_api_key_id(mut self, id: ApiKeyId) -> Self {
        self.api_key_id = Some(id);
        self
    }

    pub fn with_pages_created(mut self, count: u32) -> Self {
        self.pages_created = count;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_request_summary(mut self, summary: serde_json::Value) -> Self {
        self.request_summary = summary;
        self
    }

    pub fn with_response_summary(mut self, summary: serde_json::Value) -> Self {
        self.response_summary = summary;
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// One record per successfully created page, linked back to the request
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPageRecord {
    /// Unique ID
    id: CreatedPageRecordId,
    /// Page ID assigned by the page store
    pub page_id: u64,
    /// Page title at creation time
    pub title: String,
    /// Page permalink at creation time
    pub url: String,
    /// Key that created the page; weak reference
    pub api_key_id: ApiKeyId,
    /// The batch request that produced this page
    pub activity_record_id: ActivityRecordId,
    /// Timestamp the record was written
    pub created_at: DateTime<Utc>,
}

impl CreatedPageRecord {
    pub fn new(
        page_id: u64,
        title: impl Into<String>,
        url: impl Into<String>,
        api_key_id: ApiKeyId,
        activity_record_id: ActivityRecordId,
    ) -> Self {
        Self {
            id: CreatedPageRecordId::generate(),
            page_id,
            title: title.into(),
            url: url.into(),
            api_key_id,
            activity_record_id,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &CreatedPageRecordId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_record_builder() {
        let context = RequestContext::new("/pagebuilder/v1/create-pages", "POST")
            .with_client_ip("203.0.113.9")
            .with_user_agent("curl/8.0");

        let record = ActivityRecord::new(&context, RequestOutcome::Success)
            .with_api_key_id(ApiKeyId::new("key-1"))
            .with_pages_created(3)
            .with_duration_ms(42)
            .with_request_summary(serde_json::json!({"pages_count": 3}));

        assert!(record.id().as_str().starts_with("log-"));
        assert_eq!(record.endpoint, "/pagebuilder/v1/create-pages");
        assert_eq!(record.method, "POST");
        assert_eq!(record.outcome, RequestOutcome::Success);
        assert_eq!(record.pages_created, 3);
        assert_eq!(record.duration_ms, 42);
        assert_eq!(record.client_ip.as_deref(), Some("203.0.113.9"));
        assert!(record.error_message.is_none());
    }

    #[test]
    fn test_failed_record_without_key() {
        let context = RequestContext::new("/pagebuilder/v1/create-pages", "POST");

        let record = ActivityRecord::new(&context, RequestOutcome::Failed)
            .with_error_message("Invalid or expired API key");

        assert!(record.api_key_id.is_none());
        assert_eq!(record.pages_created, 0);
        assert_eq!(
            record.error_message.as_deref(),
            Some("Invalid or expired API key")
        );
    }

    #[test]
    fn test_created_page_record_links_to_activity() {
        let activity_id = ActivityRecordId::generate();
        let record = CreatedPageRecord::new(
            7,
            "About Us",
            "http://localhost/pages/about-us",
            ApiKeyId::new("key-1"),
            activity_id.clone(),
        );

        assert!(record.id().as_str().starts_with("page-"));
        assert_eq!(record.page_id, 7);
        assert_eq!(record.activity_record_id, activity_id);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(RequestOutcome::Success.to_string(), "success");
        assert_eq!(RequestOutcome::Failed.to_string(), "failed");
    }
}
