//! Public v1 API

pub mod pages;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create the `/pagebuilder/v1` router
pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/create-pages", post(pages::create_pages))
}
