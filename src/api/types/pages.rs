//! Wire types for the bulk creation endpoint

use serde::{Deserialize, Serialize};

use crate::domain::page::{CreatedPage, NewPage};
use crate::infrastructure::page::BulkCreateOutcome;

/// Request body for `POST /pagebuilder/v1/create-pages`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreatePagesRequest {
    /// Items to create; a missing or empty array is a 400
    #[serde(default)]
    pub pages: Vec<NewPage>,
}

/// Response body for a processed batch (always 200, even with per-item
/// errors)
#[derive(Debug, Clone, Serialize)]
pub struct CreatePagesResponse {
    pub success: bool,
    pub message: String,
    pub data: CreatePagesData,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePagesData {
    pub created_pages: Vec<CreatedPage>,
    pub total_created: usize,
    pub total_requested: usize,
    pub errors: Vec<String>,
    pub response_time_ms: u64,
}

impl From<BulkCreateOutcome> for CreatePagesResponse {
    fn from(outcome: BulkCreateOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message,
            data: CreatePagesData {
                created_pages: outcome.created_pages,
                total_created: outcome.total_created,
                total_requested: outcome.total_requested,
                errors: outcome.errors,
                response_time_ms: outcome.response_time_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PageStatus;

    #[test]
    fn test_request_deserialization() {
        let request: CreatePagesRequest = serde_json::from_str(
            r#"{"pages": [{"title": "One"}, {"title": "Two", "status": "draft"}]}"#,
        )
        .unwrap();

        assert_eq!(request.pages.len(), 2);
        assert_eq!(request.pages[1].status, PageStatus::Draft);
    }

    #[test]
    fn test_request_missing_pages_field() {
        let request: CreatePagesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.pages.is_empty());
    }

    #[test]
    fn test_response_wire_shape() {
        let outcome = BulkCreateOutcome {
            message: "1 page(s) created successfully with 1 error(s)".to_string(),
            created_pages: vec![CreatedPage {
                id: 5,
                title: "Home".to_string(),
                url: "http://localhost/pages/home".to_string(),
                status: PageStatus::Publish,
            }],
            errors: vec!["Page #1: Title is required".to_string()],
            total_requested: 2,
            total_created: 1,
            response_time_ms: 12,
        };

        let response = CreatePagesResponse::from(outcome);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "1 page(s) created successfully with 1 error(s)",
                "data": {
                    "created_pages": [{
                        "id": 5,
                        "title": "Home",
                        "url": "http://localhost/pages/home",
                        "status": "publish"
                    }],
                    "total_created": 1,
                    "total_requested": 2,
                    "errors": ["Page #1: Title is required"],
                    "response_time_ms": 12
                }
            })
        );
    }
}
