//! Request middleware: API key and admin token extractors

mod admin;
mod auth;

pub use admin::RequireAdmin;
pub use auth::{request_context, RequireApiKey};
