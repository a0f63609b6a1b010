//! Activity trail admin endpoints

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::activity::{ActivityFilter, ActivityRecord, CreatedPageRecord, RequestOutcome};
use crate::domain::api_key::ApiKeyId;

/// Query parameters for the activity listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ActivityQuery {
    /// `success` or `failed`
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub api_key_id: Option<String>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl ActivityQuery {
    fn into_filter(self) -> Result<ActivityFilter, ApiError> {
        let outcome = match self.outcome.as_deref() {
            None => None,
            Some("success") => Some(RequestOutcome::Success),
            Some("failed") => Some(RequestOutcome::Failed),
            Some(other) => {
                return Err(ApiError::invalid_request(format!(
                    "Unknown outcome '{}'; expected 'success' or 'failed'",
                    other
                )))
            }
        };

        Ok(ActivityFilter {
            outcome,
            api_key_id: self.api_key_id.map(ApiKeyId::from),
            from: self.from,
            to: self.to,
        })
    }
}

/// Activity record response
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecordResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_id: Option<String>,
    pub endpoint: String,
    pub method: String,
    pub outcome: String,
    pub pages_created: u32,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub request_summary: serde_json::Value,
    pub response_summary: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ActivityRecord> for ActivityRecordResponse {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            id: record.id().to_string(),
            api_key_id: record.api_key_id.as_ref().map(|id| id.to_string()),
            endpoint: record.endpoint.clone(),
            method: record.method.clone(),
            outcome: record.outcome.to_string(),
            pages_created: record.pages_created,
            duration_ms: record.duration_ms,
            client_ip: record.client_ip.clone(),
            user_agent: record.user_agent.clone(),
            request_summary: record.request_summary.clone(),
            response_summary: record.response_summary.clone(),
            error_message: record.error_message.clone(),
            created_at: record.created_at,
        }
    }
}

/// Created-page record response
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPageResponse {
    pub id: String,
    pub page_id: u64,
    pub title: String,
    pub url: String,
    pub api_key_id: String,
    pub activity_record_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CreatedPageRecord> for CreatedPageResponse {
    fn from(record: &CreatedPageRecord) -> Self {
        Self {
            id: record.id().to_string(),
            page_id: record.page_id,
            title: record.title.clone(),
            url: record.url.clone(),
            api_key_id: record.api_key_id.to_string(),
            activity_record_id: record.activity_record_id.to_string(),
            created_at: record.created_at,
        }
    }
}

/// `GET /admin/activity`
pub async fn list_activity(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRecordResponse>>, ApiError> {
    let filter = query.into_filter()?;
    let records = state.activity_service.records(&filter).await?;

    Ok(Json(
        records.iter().map(ActivityRecordResponse::from).collect(),
    ))
}

/// `GET /admin/created-pages`
pub async fn list_created_pages(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<CreatedPageResponse>>, ApiError> {
    let pages = state.activity_service.created_pages().await?;

    Ok(Json(pages.iter().map(CreatedPageResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let query = ActivityQuery {
            outcome: Some("failed".to_string()),
            api_key_id: Some("key-1".to_string()),
            ..Default::default()
        };

        let filter = query.into_filter().unwrap();
        assert_eq!(filter.outcome, Some(RequestOutcome::Failed));
        assert_eq!(filter.api_key_id.unwrap().as_str(), "key-1");
    }

    #[test]
    fn test_query_rejects_unknown_outcome() {
        let query = ActivityQuery {
            outcome: Some("partial".to_string()),
            ..Default::default()
        };

        let error = query.into_filter().unwrap_err();
        assert_eq!(error.body.code, "invalid_request");
    }
}
