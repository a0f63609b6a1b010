use thiserror::Error;

/// Which authentication check rejected the presented API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No key was supplied with the request
    MissingKey,
    /// The supplied key matched no active key hash
    InvalidKey,
    /// The key hash matched but the key has passed its expiration date
    ExpiredKey,
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey => write!(f, "missing_key"),
            Self::InvalidKey => write!(f, "invalid_key"),
            Self::ExpiredKey => write!(f, "expired_key"),
        }
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error ({kind}): {message}")]
    Authentication { kind: AuthErrorKind, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Service disabled: {message}")]
    ServiceDisabled { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn authentication(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self::Authentication {
            kind,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    pub fn service_disabled(message: impl Into<String>) -> Self {
        Self::ServiceDisabled {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("API key 'key-1' not found");
        assert_eq!(error.to_string(), "Not found: API key 'key-1' not found");
    }

    #[test]
    fn test_authentication_error() {
        let error = DomainError::authentication(AuthErrorKind::ExpiredKey, "key has expired");
        assert_eq!(
            error.to_string(),
            "Authentication error (expired_key): key has expired"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let error = DomainError::rate_limited("hourly quota exhausted");
        assert_eq!(error.to_string(), "Rate limited: hourly quota exhausted");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }
}
