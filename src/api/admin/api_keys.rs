//! API key management admin endpoints

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::ApiKey;

/// Request to generate a new API key
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// API key response; never carries hash or secret
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    pub key_preview: String,
    pub status: String,
    pub request_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().to_string(),
            name: key.name().to_string(),
            key_preview: key.key_preview().to_string(),
            status: key.status().to_string(),
            request_count: key.request_count(),
            expires_at: key.expires_at(),
            last_used_at: key.last_used_at(),
            created_at: key.created_at(),
        }
    }
}

/// API key response with the one-time secret, returned only on creation
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyWithSecretResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    /// Shown exactly once; not retrievable afterwards
    pub secret: String,
}

/// Rate limit state of one key
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitStatusResponse {
    pub limit: u32,
    pub remaining: u32,
}

/// `POST /admin/api-keys`
pub async fn create_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<Json<ApiKeyWithSecretResponse>, ApiError> {
    let generated = state
        .api_key_service
        .generate(&request.name, request.expires_at)
        .await?;

    Ok(Json(ApiKeyWithSecretResponse {
        api_key: ApiKeyResponse::from(&generated.api_key),
        secret: generated.secret,
    }))
}

/// `GET /admin/api-keys`
pub async fn list_api_keys(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<ApiKeyResponse>>, ApiError> {
    let keys = state.api_key_service.list().await?;
    Ok(Json(keys.iter().map(ApiKeyResponse::from).collect()))
}

/// `GET /admin/api-keys/{key_id}`
pub async fn get_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let key = state
        .api_key_service
        .get(&key_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", key_id)))?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// `POST /admin/api-keys/{key_id}/revoke`
pub async fn revoke_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let key = state.api_key_service.revoke(&key_id).await?;
    Ok(Json(ApiKeyResponse::from(&key)))
}

/// `DELETE /admin/api-keys/{key_id}`
pub async fn delete_api_key(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.api_key_service.delete(&key_id).await?;

    if !deleted {
        return Err(ApiError::not_found(format!(
            "API key '{}' not found",
            key_id
        )));
    }

    Ok(Json(serde_json::json!({"deleted": true})))
}

/// `GET /admin/api-keys/{key_id}/rate-limit`
pub async fn get_rate_limit(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<RateLimitStatusResponse>, ApiError> {
    state
        .api_key_service
        .get(&key_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", key_id)))?;

    Ok(Json(RateLimitStatusResponse {
        limit: state.api_key_service.rate_limit(),
        remaining: state.api_key_service.rate_limit_remaining(&key_id),
    }))
}

/// `POST /admin/api-keys/{key_id}/reset-rate-limit`
pub async fn reset_rate_limit(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<RateLimitStatusResponse>, ApiError> {
    state
        .api_key_service
        .get(&key_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("API key '{}' not found", key_id)))?;

    state.api_key_service.reset_rate_limit(&key_id);

    Ok(Json(RateLimitStatusResponse {
        limit: state.api_key_service.rate_limit(),
        remaining: state.api_key_service.rate_limit_remaining(&key_id),
    }))
}
