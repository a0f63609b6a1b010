//! API wire types

mod error;
mod json;
mod pages;

pub use error::{ApiError, ApiErrorBody, ApiErrorData};
pub use json::Json;
pub use pages::{CreatePagesData, CreatePagesRequest, CreatePagesResponse};
