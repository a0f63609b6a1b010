//! Bulk page creation service
//!
//! The single orchestration entry point behind the create-pages endpoint:
//! validates the batch, walks the items in order with partial-failure
//! semantics, writes the activity trail, and triggers the webhook
//! notification when anything was created.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::activity::{
    ActivityLogRepository, ActivityRecord, CreatedPageRecord, RequestContext, RequestOutcome,
};
use crate::domain::api_key::ApiKey;
use crate::domain::page::{CreatedPage, NewPage, PageDraft, PageStore};
use crate::domain::webhook::{PageSummary, WebhookPayload};
use crate::domain::DomainError;
use crate::infrastructure::webhook::WebhookNotifier;

/// Outcome of a bulk creation request
#[derive(Debug, Clone)]
pub struct BulkCreateOutcome {
    /// Human-readable summary embedding the counts
    pub message: String,
    /// Summaries of every page created, in input order
    pub created_pages: Vec<CreatedPage>,
    /// Per-item error strings; non-empty errors never fail the batch
    pub errors: Vec<String>,
    /// Number of items in the request
    pub total_requested: usize,
    /// Number of items that produced a page
    pub total_created: usize,
    /// Wall-clock handling time in milliseconds
    pub response_time_ms: u64,
}

/// Orchestrates validation, creation, logging, and notification
#[derive(Debug)]
pub struct BulkPageService {
    page_store: Arc<dyn PageStore>,
    activity: Arc<dyn ActivityLogRepository>,
    notifier: Arc<dyn WebhookNotifier>,
}

impl BulkPageService {
    pub fn new(
        page_store: Arc<dyn PageStore>,
        activity: Arc<dyn ActivityLogRepository>,
        notifier: Arc<dyn WebhookNotifier>,
    ) -> Self {
        Self {
            page_store,
            activity,
            notifier,
        }
    }

    /// Process a bulk creation batch for an authenticated key
    ///
    /// Individual items fail independently; the only request-level failure
    /// is an empty batch. Authentication and rate limiting happen upstream
    /// and never reach this method.
    pub async fn create_pages(
        &self,
        api_key: &ApiKey,
        items: Vec<NewPage>,
        context: &RequestContext,
    ) -> Result<BulkCreateOutcome, DomainError> {
        let start = Instant::now();

        if items.is_empty() {
            let error = r#"The "pages" parameter is required and must be a non-empty array"#;
            self.log_rejected_request(api_key, context, error, start)
                .await;
            return Err(DomainError::validation(error));
        }

        let mut created_pages: Vec<CreatedPage> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        // Items are processed strictly in input order; later items may
        // reference earlier pages through parent_id
        for (index, item) in items.iter().enumerate() {
            let title = match item.title.as_deref().map(str::trim) {
                Some(title) if !title.is_empty() => title.to_string(),
                _ => {
                    errors.push(format!("Page #{}: Title is required", index));
                    continue;
                }
            };

            let draft = PageDraft::from_item(title.clone(), item);
            let page_id = match self.page_store.create_page(&draft).await {
                Ok(page_id) => page_id,
                Err(e) => {
                    errors.push(format!("Page #{} ({}): {}", index, title, e));
                    continue;
                }
            };

            self.apply_side_effects(page_id, item).await;

            // Prefer the store's view of the page (canonical permalink and
            // status); fall back to what was submitted
            let page = match self.page_store.get_page(page_id).await {
                Ok(Some(page)) => page,
                _ => CreatedPage {
                    id: page_id,
                    title,
                    url: String::new(),
                    status: draft.status,
                },
            };

            created_pages.push(page);
        }

        let response_time_ms = start.elapsed().as_millis() as u64;
        let total_requested = items.len();
        let total_created = created_pages.len();

        let record = ActivityRecord::new(context, RequestOutcome::Success)
            .with_api_key_id(api_key.id().clone())
            .with_pages_created(total_created as u32)
            .with_duration_ms(response_time_ms)
            .with_request_summary(serde_json::json!({ "pages_count": total_requested }))
            .with_response_summary(serde_json::json!({
                "created": total_created,
                "errors": errors.len(),
            }));

        let activity_record_id = match self.activity.append(record).await {
            Ok(record) => Some(record.id().clone()),
            Err(e) => {
                warn!(error = %e, "Failed to record batch activity");
                None
            }
        };

        if let Some(ref activity_record_id) = activity_record_id {
            for page in &created_pages {
                let page_record = CreatedPageRecord::new(
                    page.id,
                    &page.title,
                    &page.url,
                    api_key.id().clone(),
                    activity_record_id.clone(),
                );
                if let Err(e) = self.activity.append_created_page(page_record).await {
                    warn!(page_id = page.id, error = %e, "Failed to record created page");
                }
            }
        }

        if !created_pages.is_empty() {
            let summaries: Vec<PageSummary> =
                created_pages.iter().map(PageSummary::from).collect();
            let payload = WebhookPayload::pages_created(api_key.name(), summaries);
            let delivery = self.notifier.notify(&payload).await;
            debug!(request_id = %payload.request_id, result = ?delivery, "Webhook notification finished");
        }

        info!(
            api_key_id = %api_key.id(),
            total_requested = total_requested,
            total_created = total_created,
            errors = errors.len(),
            response_time_ms = response_time_ms,
            "Bulk page creation finished"
        );

        Ok(BulkCreateOutcome {
            message: build_message(total_created, errors.len()),
            created_pages,
            errors,
            total_requested,
            total_created,
            response_time_ms,
        })
    }

    /// Attach metadata and the featured image. These are best-effort:
    /// failures are logged and never turn the item into an error.
    async fn apply_side_effects(&self, page_id: u64, item: &NewPage) {
        if let Some(ref meta) = item.meta {
            for (key, value) in meta {
                if let Err(e) = self.page_store.set_meta(page_id, key, value).await {
                    warn!(page_id = page_id, meta_key = %key, error = %e, "Failed to attach page meta");
                }
            }
        }

        if let Some(ref image_url) = item.featured_image_url {
            if !is_safe_image_url(image_url) {
                warn!(page_id = page_id, url = %image_url, "Skipping featured image with unsupported URL scheme");
                return;
            }

            if let Err(e) = self.page_store.set_featured_image(page_id, image_url).await {
                warn!(page_id = page_id, error = %e, "Failed to set featured image");
            }
        }
    }

    async fn log_rejected_request(
        &self,
        api_key: &ApiKey,
        context: &RequestContext,
        error: &str,
        start: Instant,
    ) {
        let record = ActivityRecord::new(context, RequestOutcome::Failed)
            .with_api_key_id(api_key.id().clone())
            .with_duration_ms(start.elapsed().as_millis() as u64)
            .with_error_message(error);

        if let Err(e) = self.activity.append(record).await {
            warn!(error = %e, "Failed to record rejected request");
        }
    }
}

fn build_message(created: usize, errors: usize) -> String {
    if errors > 0 {
        format!(
            "{} page(s) created successfully with {} error(s)",
            created, errors
        )
    } else {
        format!("{} page(s) created successfully", created)
    }
}

fn is_safe_image_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
