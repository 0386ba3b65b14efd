//! Account and session routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the account router
///
/// # Routes
/// - `POST /api/signup` - Create an account and issue an OTP
/// - `POST /api/verify/:email` - Consume the OTP
/// - `POST /api/resend/:email` - Regenerate and resend the OTP
/// - `POST /api/login` - Establish a session
/// - `POST /api/logout` - Clear the session
/// - `GET /api/me` - Current session user
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/signup", post(handlers::signup))
        .route("/api/verify/:email", post(handlers::verify_otp))
        .route("/api/resend/:email", post(handlers::resend_otp))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/me", get(handlers::me_handler))
}
