//! Webhook domain
//!
//! Payload types for outbound signed notifications.

mod payload;

pub use payload::{new_request_id, PageSummary, WebhookPayload, PAGES_CREATED_EVENT};
