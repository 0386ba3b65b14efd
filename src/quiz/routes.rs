//! Quiz routes

use axum::{routing::post, Router};

use super::handlers;

/// # Routes
/// - `POST /quiz` - Generate a quiz for a topic
/// - `POST /submit_quiz` - Grade submitted answers
pub fn quiz_routes() -> Router {
    Router::new()
        .route("/quiz", post(handlers::create_quiz))
        .route("/submit_quiz", post(handlers::submit_quiz))
}
