//! In-memory page store
//!
//! Development and test stand-in for the external content engine. Assigns
//! sequential page IDs and builds permalinks from the configured base URL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::page::{CreatedPage, PageDraft, PageStatus, PageStore};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredPage {
    title: String,
    status: PageStatus,
    url: String,
    meta: HashMap<String, serde_json::Value>,
    featured_image_url: Option<String>,
}

/// Thread-safe in-memory page store
#[derive(Debug)]
pub struct InMemoryPageStore {
    base_url: String,
    next_id: AtomicU64,
    pages: RwLock<HashMap<u64, StoredPage>>,
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            next_id: AtomicU64::new(1),
            pages: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Metadata attached to a page, for inspection in tests
    pub fn meta_of(&self, page_id: u64) -> Option<HashMap<String, serde_json::Value>> {
        self.pages
            .read()
            .ok()?
            .get(&page_id)
            .map(|p| p.meta.clone())
    }

    /// Featured image recorded for a page, for inspection in tests
    pub fn featured_image_of(&self, page_id: u64) -> Option<String> {
        self.pages
            .read()
            .ok()?
            .get(&page_id)
            .and_then(|p| p.featured_image_url.clone())
    }

    fn permalink(&self, page_id: u64, slug: Option<&str>) -> String {
        match slug {
            Some(slug) if !slug.is_empty() => format!("{}/pages/{}", self.base_url, slug),
            _ => format!("{}/pages/{}", self.base_url, page_id),
        }
    }
}

impl Default for InMemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageStore for InMemoryPageStore {
    async fn create_page(&self, draft: &PageDraft) -> Result<u64, DomainError> {
        let page_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let url = self.permalink(page_id, draft.slug.as_deref());

        let mut pages = self
            .pages
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        pages.insert(
            page_id,
            StoredPage {
                title: draft.title.clone(),
                status: draft.status,
                url,
                meta: HashMap::new(),
                featured_image_url: None,
            },
        );

        Ok(page_id)
    }

    async fn get_page(&self, page_id: u64) -> Result<Option<CreatedPage>, DomainError> {
        let pages = self
            .pages
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(pages.get(&page_id).map(|p| CreatedPage {
            id: page_id,
            title: p.title.clone(),
            url: p.url.clone(),
            status: p.status,
        }))
    }

    async fn set_meta(
        &self,
        page_id: u64,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DomainError> {
        let mut pages = self
            .pages
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let page = pages
            .get_mut(&page_id)
            .ok_or_else(|| DomainError::not_found(format!("Page {} not found", page_id)))?;

        page.meta.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn set_featured_image(&self, page_id: u64, image_url: &str) -> Result<(), DomainError> {
        let mut pages = self
            .pages
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        let page = pages
            .get_mut(&page_id)
            .ok_or_else(|| DomainError::not_found(format!("Page {} not found", page_id)))?;

        page.featured_image_url = Some(image_url.to_string());
        Ok(())
    }
}
