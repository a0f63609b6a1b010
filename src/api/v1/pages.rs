//! Bulk page creation endpoint

use axum::extract::State;

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CreatePagesRequest, CreatePagesResponse, Json};

/// `POST /pagebuilder/v1/create-pages`
///
/// Authentication and rate limiting happen in the extractor; by the time
/// this runs the key is valid and admitted. Per-item failures surface in
/// the 200 response's `errors` array; only an empty batch is fatal.
pub async fn create_pages(
    State(state): State<AppState>,
    auth: RequireApiKey,
    Json(request): Json<CreatePagesRequest>,
) -> Result<Json<CreatePagesResponse>, ApiError> {
    let outcome = state
        .page_service
        .create_pages(&auth.api_key, request.pages, &auth.context)
        .await?;

    Ok(Json(outcome.into()))
}
