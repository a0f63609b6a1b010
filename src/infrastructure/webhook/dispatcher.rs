//! Webhook delivery
//!
//! Delivers signed `pages_created` notifications to the configured URL.
//! Delivery is best-effort with bounded retry: up to three total
//! tries with exponential backoff between failures. Outcomes are reported
//! to the caller and logged; they are never surfaced to the API client
//! that triggered the notification.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::domain::webhook::WebhookPayload;

use super::signer::WebhookSigner;

/// User agent sent with webhook requests
const WEBHOOK_USER_AGENT: &str = concat!("pagebuilder-api-webhook/", env!("CARGO_PKG_VERSION"));

/// Terminal result of a delivery attempt sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// No destination URL is configured; nothing was sent
    NotConfigured,
    /// A try received a 2xx response
    Delivered { attempts: u32 },
    /// Every try failed; carries the last observed error detail
    Failed { attempts: u32, last_error: String },
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Notification capability consumed by the bulk creation service
#[async_trait]
pub trait WebhookNotifier: Send + Sync + Debug {
    /// Deliver a payload, driving retries internally
    async fn notify(&self, payload: &WebhookPayload) -> DeliveryResult;
}

/// Webhook dispatcher configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Destination URL; `None` disables delivery entirely
    pub url: Option<String>,
    /// Shared secret for payload signing
    pub secret: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Retries after the initial try (2 means 3 total tries)
    pub max_retries: u32,
    /// Base backoff; the wait after failed try N is `base * 2^N`
    pub backoff_base: Duration,
}

impl WebhookConfig {
    pub fn new(url: Option<String>, secret: impl Into<String>) -> Self {
        Self {
            url,
            secret: secret.into(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff_base: Duration::from_secs(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }
}

/// HTTP webhook dispatcher with signing and bounded retry
#[derive(Debug)]
pub struct WebhookDispatcher {
    config: WebhookConfig,
    signer: WebhookSigner,
    http_client: Client,
}

impl WebhookDispatcher {
    pub fn new(config: WebhookConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        let signer = WebhookSigner::new(&config.secret);

        Self {
            config,
            signer,
            http_client,
        }
    }

    async fn try_once(&self, url: &str, body: &[u8], signature: &str) -> Result<u16, String> {
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-Webhook-Signature", signature)
            .header(USER_AGENT, WEBHOOK_USER_AGENT)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "Request timed out".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    format!("Request failed: {}", e)
                }
            })?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(status);
        }

        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(1000)
            .collect();
        Err(format!("HTTP {}: {}", status, body))
    }
}

#[async_trait]
impl WebhookNotifier for WebhookDispatcher {
    async fn notify(&self, payload: &WebhookPayload) -> DeliveryResult {
        let Some(url) = self.config.url.as_deref().filter(|u| !u.is_empty()) else {
            debug!("No webhook URL configured, skipping notification");
            return DeliveryResult::NotConfigured;
        };

        // The signature covers these exact bytes; receivers must verify
        // against the raw request body, not a re-serialization
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to serialize webhook payload");
                return DeliveryResult::Failed {
                    attempts: 0,
                    last_error: format!("Failed to serialize payload: {}", e),
                };
            }
        };
        let signature = self.signer.sign(&body);

        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            match self.try_once(url, &body, &signature).await {
                Ok(status) => {
                    info!(
                        request_id = %payload.request_id,
                        status = status,
                        attempts = attempt + 1,
                        "Webhook delivered"
                    );
                    return DeliveryResult::Delivered {
                        attempts: attempt + 1,
                    };
                }
                Err(error) => {
                    debug!(
                        request_id = %payload.request_id,
                        attempt = attempt + 1,
                        error = %error,
                        "Webhook try failed"
                    );
                    last_error = error;
                }
            }

            if attempt < self.config.max_retries {
                tokio::time::sleep(self.config.backoff_base * 2u32.pow(attempt)).await;
            }
        }

        let attempts = self.config.max_retries + 1;
        warn!(
            request_id = %payload.request_id,
            attempts = attempts,
            last_error = %last_error,
            "Webhook delivery failed after all tries"
        );

        DeliveryResult::Failed {
            attempts,
            last_error,
        }
    }
}
