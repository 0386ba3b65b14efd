//! Search routes

use axum::{routing::get, Router};

use super::handlers;

/// # Routes
/// - `GET /api/search?q=` - Keyword search via the external provider
pub fn search_routes() -> Router {
    Router::new().route("/api/search", get(handlers::api_search))
}
