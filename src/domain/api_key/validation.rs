//! API key validation utilities

use thiserror::Error;

/// Errors that can occur while validating key attributes
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key name cannot be empty")]
    EmptyName,

    #[error("API key name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

const MAX_KEY_NAME_LENGTH: usize = 255;

/// Validate an API key display name
///
/// Rules:
/// - Cannot be empty or whitespace-only
/// - Maximum 255 characters
pub fn validate_key_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.trim().is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if name.len() > MAX_KEY_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_KEY_NAME_LENGTH));
    }

    Ok(())
}
