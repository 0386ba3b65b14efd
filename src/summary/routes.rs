//! Summary routes

use axum::{routing::post, Router};

use super::handlers;

/// # Routes
/// - `POST /summary` - Summarize text or a looked-up topic
pub fn summary_routes() -> Router {
    Router::new().route("/summary", post(handlers::create_summary))
}
