//! API key authentication middleware
//!
//! Extractor gating the public endpoint: service switch, key extraction
//! (`X-API-Key` header or `api_key` query parameter), authentication, and
//! the per-key rate limit. Every rejection is recorded in the activity
//! trail before the error response leaves.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::activity::{ActivityRecord, RequestContext, RequestOutcome};
use crate::domain::api_key::{ApiKey, ApiKeyId};
use crate::domain::DomainError;

/// Extractor that requires a valid, rate-limit-admitted API key
///
/// Carries the authenticated key and the request context so handlers can
/// thread both into the activity trail.
#[derive(Debug, Clone)]
pub struct RequireApiKey {
    pub api_key: ApiKey,
    pub context: RequestContext,
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let context = request_context(parts);

        if !state.api_enabled {
            let error = ApiError::api_disabled();
            log_rejection(state, &context, None, &error).await;
            return Err(error);
        }

        let Some(presented) = extract_api_key(parts) else {
            let error = ApiError::missing_api_key();
            log_rejection(state, &context, None, &error).await;
            return Err(error);
        };

        debug!(
            key_preview = %presented.chars().take(12).collect::<String>(),
            "Validating API key"
        );

        let api_key = match state.api_key_service.validate(&presented).await {
            Ok(api_key) => api_key,
            Err(e) => {
                let error = match e {
                    DomainError::Authentication { .. } => ApiError::from(e),
                    other => ApiError::internal(other.to_string()),
                };
                log_rejection(state, &context, None, &error).await;
                return Err(error);
            }
        };

        let decision = state.api_key_service.check_rate_limit(api_key.id().as_str());
        if !decision.allowed {
            let error = ApiError::rate_limit_exceeded();
            log_rejection(state, &context, Some(api_key.id().clone()), &error).await;
            return Err(error);
        }

        Ok(RequireApiKey { api_key, context })
    }
}

/// Pull the API key from the `X-API-Key` header, falling back to the
/// `api_key` query parameter
fn extract_api_key(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get("x-api-key") {
        if let Ok(key) = value.to_str() {
            let key = key.trim();
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
    }

    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
        if let Some(key) = params.get("api_key") {
            let key = key.trim();
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }
    }

    None
}

/// Build the request context from the request head
pub fn request_context(parts: &Parts) -> RequestContext {
    let mut context = RequestContext::new(parts.uri.path(), parts.method.as_str());

    if let Some(ip) = client_ip(parts) {
        context = context.with_client_ip(ip);
    }

    if let Some(agent) = parts
        .headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        context = context.with_user_agent(agent);
    }

    context
}

/// Best-effort client IP: forwarded headers first, in proxy order
fn client_ip(parts: &Parts) -> Option<String> {
    for header_name in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = parts.headers.get(header_name) {
            if let Ok(value) = value.to_str() {
                if let Some(ip) = value.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
                    return Some(ip.to_string());
                }
            }
        }
    }

    None
}

/// Record a terminal rejection in the activity trail; logging failures must
/// never mask the response
async fn log_rejection(
    state: &AppState,
    context: &RequestContext,
    api_key_id: Option<ApiKeyId>,
    error: &ApiError,
) {
    let mut record = ActivityRecord::new(context, RequestOutcome::Failed)
        .with_error_message(&error.body.message);

    if let Some(api_key_id) = api_key_id {
        record = record.with_api_key_id(api_key_id);
    }

    if let Err(e) = state.activity_service.log_request(record).await {
        warn!(error = %e, "Failed to record rejected request");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().method("POST").uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extract_from_header() {
        let parts = parts_for("/x", &[("x-api-key", "spb_abc")]);
        assert_eq!(extract_api_key(&parts).as_deref(), Some("spb_abc"));
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let parts = parts_for("/x", &[("x-api-key", "  spb_abc  ")]);
        assert_eq!(extract_api_key(&parts).as_deref(), Some("spb_abc"));
    }

    #[test]
    fn test_extract_from_query_param() {
        let parts = parts_for("/x?api_key=spb_from_query", &[]);
        assert_eq!(extract_api_key(&parts).as_deref(), Some("spb_from_query"));
    }

    #[test]
    fn test_header_takes_precedence_over_query() {
        let parts = parts_for("/x?api_key=spb_query", &[("x-api-key", "spb_header")]);
        assert_eq!(extract_api_key(&parts).as_deref(), Some("spb_header"));
    }

    #[test]
    fn test_extract_missing() {
        let parts = parts_for("/x", &[]);
        assert!(extract_api_key(&parts).is_none());

        let parts = parts_for("/x", &[("x-api-key", "   ")]);
        assert!(extract_api_key(&parts).is_none());
    }

    #[test]
    fn test_request_context_captures_endpoint_and_agent() {
        let parts = parts_for(
            "/pagebuilder/v1/create-pages?api_key=x",
            &[("user-agent", "curl/8.0")],
        );

        let context = request_context(&parts);

        assert_eq!(context.endpoint, "/pagebuilder/v1/create-pages");
        assert_eq!(context.method, "POST");
        assert_eq!(context.user_agent.as_deref(), Some("curl/8.0"));
        assert!(context.client_ip.is_none());
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let parts = parts_for(
            "/x",
            &[
                ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
                ("x-real-ip", "198.51.100.2"),
            ],
        );

        assert_eq!(client_ip(&parts).as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let parts = parts_for("/x", &[("x-real-ip", "198.51.100.2")]);
        assert_eq!(client_ip(&parts).as_deref(), Some("198.51.100.2"));
    }
}
