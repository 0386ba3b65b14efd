//! Account data models and the OTP lifecycle

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::error;

use crate::common::ApiError;

/// OTP validity window
pub const OTP_TTL_MINUTES: i64 = 5;

/// User database model
///
/// Invariant: a verified user has `otp` and `otp_expiry` both NULL. An OTP
/// that was consumed or superseded is cleared so it cannot be replayed.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub verified: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expiry: Option<String>,
    pub created_at: Option<String>,
}

impl User {
    /// Parse the stored expiry timestamp, if any
    pub fn otp_expiry_time(&self) -> Option<DateTime<Utc>> {
        self.otp_expiry
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Check a submitted OTP against the stored one at time `now`.
    ///
    /// Mismatch (or no stored code) is reported before expiry, matching the
    /// original flow. The caller clears the code on success; this check
    /// mutates nothing.
    pub fn check_otp(&self, submitted: &str, now: DateTime<Utc>) -> Result<(), ApiError> {
        let code = self.otp.as_deref().ok_or(ApiError::InvalidOtp)?;
        if code != submitted {
            return Err(ApiError::InvalidOtp);
        }
        match self.otp_expiry_time() {
            Some(expiry) if now <= expiry => Ok(()),
            _ => Err(ApiError::ExpiredOtp),
        }
    }
}

/// Session database model, keyed by the `qs_session` cookie
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Generate a fresh 6-digit OTP and its expiry timestamp
pub fn generate_otp(now: DateTime<Utc>) -> (String, DateTime<Utc>) {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    (code.to_string(), now + Duration::minutes(OTP_TTL_MINUTES))
}

/// Hash a plaintext password with argon2 and a random salt
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            ApiError::InternalServer("password hashing failed".to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored argon2 hash
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        ApiError::InternalServer("stored password hash is malformed".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
