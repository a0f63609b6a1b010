//! Page store collaborator trait
//!
//! The content engine that actually owns pages is external to this service.
//! This trait is the seam: page creation, permalink/status lookup, metadata
//! attachment, and representative-image assignment from a URL.

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{CreatedPage, PageDraft};
use crate::domain::DomainError;

/// External page storage capability consumed by the bulk creation service
#[async_trait]
pub trait PageStore: Send + Sync + Debug {
    /// Create a page from a draft, returning the assigned page ID
    async fn create_page(&self, draft: &PageDraft) -> Result<u64, DomainError>;

    /// Look up the permalink/title/status summary of a page
    async fn get_page(&self, page_id: u64) -> Result<Option<CreatedPage>, DomainError>;

    /// Attach one metadata entry to a page
    async fn set_meta(
        &self,
        page_id: u64,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DomainError>;

    /// Fetch an image from a URL and make it the page's representative
    /// image. Best-effort from the caller's perspective.
    async fn set_featured_image(&self, page_id: u64, image_url: &str) -> Result<(), DomainError>;
}
