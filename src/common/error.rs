// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    ValidationError(String),
    NotFound(String),
    DuplicateEmail,
    UnknownUser,
    InvalidOtp,
    ExpiredOtp,
    InvalidCredentials,
    NotVerified,
    ConversionError(String),
    ExternalApiError(String),
    PayloadTooLarge,
    DatabaseError(sqlx::Error),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::DuplicateEmail => write!(f, "An account with this email already exists"),
            ApiError::UnknownUser => write!(f, "No account with this email"),
            ApiError::InvalidOtp => write!(f, "Invalid verification code"),
            ApiError::ExpiredOtp => write!(f, "Verification code has expired"),
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::NotVerified => write!(f, "Account email is not verified"),
            ApiError::ConversionError(msg) => write!(f, "Conversion Error: {}", msg),
            ApiError::ExternalApiError(msg) => write!(f, "External API Error: {}", msg),
            ApiError::PayloadTooLarge => write!(f, "Uploaded file is too large"),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::DuplicateEmail => (
                StatusCode::CONFLICT,
                "An account with this email already exists".to_string(),
                "DUPLICATE_EMAIL",
            ),
            ApiError::UnknownUser => (
                StatusCode::NOT_FOUND,
                "No account with this email".to_string(),
                "UNKNOWN_USER",
            ),
            ApiError::InvalidOtp => (
                StatusCode::BAD_REQUEST,
                "Invalid verification code".to_string(),
                "INVALID_OTP",
            ),
            ApiError::ExpiredOtp => (
                StatusCode::BAD_REQUEST,
                "Verification code has expired".to_string(),
                "EXPIRED_OTP",
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
                "INVALID_CREDENTIALS",
            ),
            ApiError::NotVerified => (
                StatusCode::FORBIDDEN,
                "Account email is not verified".to_string(),
                "NOT_VERIFIED",
            ),
            ApiError::ConversionError(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg, "CONVERSION_ERROR")
            }
            ApiError::ExternalApiError(msg) => (StatusCode::BAD_GATEWAY, msg, "EXTERNAL_API_ERROR"),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Uploaded file is too large".to_string(),
                "PAYLOAD_TOO_LARGE",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
