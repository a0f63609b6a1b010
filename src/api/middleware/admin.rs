//! Admin authentication middleware
//!
//! The admin surface is guarded by a shared token from configuration,
//! presented in the `X-Admin-Token` header. With no token configured the
//! surface is disabled outright.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Extractor that requires the configured admin token
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(ref expected) = state.admin_token else {
            return Err(ApiError::admin_disabled());
        };

        let presented = parts
            .headers
            .get("x-admin-token")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        if presented.is_empty() || presented != expected {
            return Err(ApiError::invalid_admin_token());
        }

        Ok(RequireAdmin)
    }
}
