//! # Auth Module
//!
//! Account and session management:
//! - signup with email OTP verification
//! - argon2 password hashing
//! - cookie-backed server-side sessions
//! - SessionUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;


pub use extractors::SessionUser;
pub use models::User;
pub use routes::auth_routes;
