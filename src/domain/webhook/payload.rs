//! Webhook payload types
//!
//! The notification body sent to the configured callback URL after a batch
//! creates at least one page. The payload carries no sensitive data: key
//! display name only, never key material.

use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::page::CreatedPage;

/// Event name for the bulk-creation notification
pub const PAGES_CREATED_EVENT: &str = "pages_created";

/// Per-page summary included in the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub status: String,
}

impl From<&CreatedPage> for PageSummary {
    fn from(page: &CreatedPage) -> Self {
        Self {
            id: page.id,
            title: page.title.clone(),
            url: page.url.clone(),
            status: page.status.to_string(),
        }
    }
}

/// Webhook notification payload
///
/// The signature is computed over the exact serialized byte form of this
/// struct, so field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Event name, `pages_created`
    pub event: String,
    /// UTC timestamp, RFC 3339 with `Z` suffix
    pub timestamp: String,
    /// Correlation ID, freshly generated per delivery
    pub request_id: String,
    /// Display name of the key that made the originating request
    pub api_key_name: String,
    /// Number of pages in `pages`
    pub total_pages: usize,
    /// Created-page summaries
    pub pages: Vec<PageSummary>,
}

impl WebhookPayload {
    /// Build a `pages_created` payload with a fresh timestamp and
    /// correlation ID
    pub fn pages_created(api_key_name: impl Into<String>, pages: Vec<PageSummary>) -> Self {
        Self {
            event: PAGES_CREATED_EVENT.to_string(),
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            request_id: new_request_id(),
            api_key_name: api_key_name.into(),
            total_pages: pages.len(),
            pages,
        }
    }
}

/// Generate a random correlation ID of the form `req_<16 hex chars>`
pub fn new_request_id() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("req_{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PageStatus;

    fn sample_page(id: u64) -> CreatedPage {
        CreatedPage {
            id,
            title: format!("Page {}", id),
            url: format!("http://localhost/pages/{}", id),
            status: PageStatus::Publish,
        }
    }

    #[test]
    fn test_request_id_format() {
        let id = new_request_id();

        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), 4 + 16);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(new_request_id(), new_request_id());
    }

    #[test]
    fn test_pages_created_payload() {
        let pages = vec![
            PageSummary::from(&sample_page(1)),
            PageSummary::from(&sample_page(2)),
        ];
        let payload = WebhookPayload::pages_created("Production Key", pages);

        assert_eq!(payload.event, "pages_created");
        assert_eq!(payload.api_key_name, "Production Key");
        assert_eq!(payload.total_pages, 2);
        assert_eq!(payload.pages[0].status, "publish");
        assert!(payload.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_payload_serialization_field_order() {
        let payload = WebhookPayload::pages_created("Key", vec![]);
        let json = serde_json::to_string(&payload).unwrap();

        let event_pos = json.find("\"event\"").unwrap();
        let timestamp_pos = json.find("\"timestamp\"").unwrap();
        let request_id_pos = json.find("\"request_id\"").unwrap();
        let pages_pos = json.find("\"pages\"").unwrap();

        assert!(event_pos < timestamp_pos);
        assert!(timestamp_pos < request_id_pos);
        assert!(request_id_pos < pages_pos);
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        let payload =
            WebhookPayload::pages_created("Key", vec![PageSummary::from(&sample_page(1))]);

        let bytes = serde_json::to_vec(&payload).unwrap();
        let decoded: WebhookPayload = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded, payload);
    }
}
