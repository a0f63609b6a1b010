//! Page types: the inbound item, the validated draft handed to the page
//! store, and the created-page summary returned to callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Publication status of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Publicly visible
    #[default]
    Publish,
    /// Saved but not visible
    Draft,
    /// Awaiting review
    Pending,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One item of a bulk creation request, exactly as received on the wire.
///
/// `title` is required for creation but optional here: a missing title is a
/// per-item error reported with the item's index, never a request-level
/// deserialization failure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewPage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub meta: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
}

impl NewPage {
    /// Convenience constructor for a titled page
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// Validated per-item input handed to the page store
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub title: String,
    pub content: String,
    pub status: PageStatus,
    pub slug: Option<String>,
    pub parent_id: Option<u64>,
    pub template: Option<String>,
}

impl PageDraft {
    /// Build a draft from a wire item and its non-empty title
    pub fn from_item(title: String, item: &NewPage) -> Self {
        Self {
            title,
            content: item.content.clone().unwrap_or_default(),
            status: item.status,
            slug: item.slug.clone(),
            parent_id: item.parent_id,
            template: item.template.clone(),
        }
    }
}

/// Summary of a created page as returned to the caller and to webhook
/// receivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPage {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub status: PageStatus,
}
