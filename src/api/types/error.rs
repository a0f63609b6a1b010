//! API error type and wire format
//!
//! Every error response is `{code, message, data: {status}}` with a stable
//! machine-readable code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthErrorKind, DomainError};

/// Serialized error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub data: ApiErrorData,
}

/// Error metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorData {
    pub status: u16,
}

/// API error with HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code: code.into(),
                message: message.into(),
                data: ApiErrorData {
                    status: status.as_u16(),
                },
            },
        }
    }

    /// 401: no key supplied
    pub fn missing_api_key() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "missing_api_key",
            "API key is required. Please provide it in the X-API-Key header.",
        )
    }

    /// 401: key did not authenticate
    pub fn invalid_api_key() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_api_key",
            "Invalid or expired API key",
        )
    }

    /// 429: hourly quota exhausted
    pub fn rate_limit_exceeded() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limit_exceeded",
            "Rate limit exceeded. Please try again later.",
        )
    }

    /// 503: service switched off
    pub fn api_disabled() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "api_disabled",
            "API access is currently disabled",
        )
    }

    /// 400: malformed request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }

    /// 404
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// 503: admin surface has no token configured
    pub fn admin_disabled() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "admin_disabled",
            "Admin API is disabled: no admin token is configured",
        )
    }

    /// 401: wrong or missing admin token
    pub fn invalid_admin_token() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_admin_token",
            "A valid X-Admin-Token header is required",
        )
    }

    /// 500
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Authentication { kind, .. } => match kind {
                AuthErrorKind::MissingKey => Self::missing_api_key(),
                AuthErrorKind::InvalidKey | AuthErrorKind::ExpiredKey => Self::invalid_api_key(),
            },
            DomainError::RateLimited { .. } => Self::rate_limit_exceeded(),
            DomainError::ServiceDisabled { .. } => Self::api_disabled(),
            DomainError::Validation { message } => Self::invalid_request(message),
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Conflict { message } => {
                Self::new(StatusCode::CONFLICT, "conflict", message)
            }
            DomainError::Storage { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => Self::internal(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.body.code, self.body.message)
    }
}

impl std::error::Error for ApiError {}
