//! Page routes

use axum::{routing::get, Router};

use super::handlers;

/// # Routes
/// - `GET /` - Landing page
/// - `GET /search`, `/quiz`, `/summary`, `/docs` - Public feature pages
/// - `GET /login`, `/signup`, `/verify/:email` - Account pages
/// - `GET /dashboard`, `/converter` - Session-guarded pages
pub fn page_routes() -> Router {
    Router::new()
        .route("/", get(handlers::index_page))
        .route("/search", get(handlers::search_page))
        .route("/quiz", get(handlers::quiz_page))
        .route("/summary", get(handlers::summary_page))
        .route("/docs", get(handlers::docs_page))
        .route("/login", get(handlers::login_page))
        .route("/signup", get(handlers::signup_page))
        .route("/verify/:email", get(handlers::verify_page))
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/converter", get(handlers::converter_page))
}
