//! Admin API endpoints: key lifecycle and activity trail views

pub mod activity;
pub mod api_keys;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Create the `/admin` router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // API key management
        .route("/api-keys", get(api_keys::list_api_keys))
        .route("/api-keys", post(api_keys::create_api_key))
        .route("/api-keys/{key_id}", get(api_keys::get_api_key))
        .route("/api-keys/{key_id}", delete(api_keys::delete_api_key))
        .route("/api-keys/{key_id}/revoke", post(api_keys::revoke_api_key))
        .route("/api-keys/{key_id}/rate-limit", get(api_keys::get_rate_limit))
        .route(
            "/api-keys/{key_id}/reset-rate-limit",
            post(api_keys::reset_rate_limit),
        )
        // Activity trail
        .route("/activity", get(activity::list_activity))
        .route("/created-pages", get(activity::list_created_pages))
}
