//! Account and session handlers: signup, OTP verification, login, logout

use axum::{
    extract::{Extension, Json, Path},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::extractors::{
    clear_session_cookie, session_cookie_value, set_session_cookie, SessionUser,
};
use super::models::{
    generate_otp, hash_password, verify_password, LoginRequest, SignupRequest, User,
    VerifyOtpRequest,
};
use crate::common::{
    generate_session_id, generate_user_id, safe_email_log, validate_credentials, ApiError, AppState,
};

/// POST /api/signup
///
/// Creates an unverified account, issues a 5-minute OTP and emails it.
/// The UNIQUE column constraint backs up the duplicate check against racing
/// signups.
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let email = payload.email.trim().to_lowercase();

    let validation = validate_credentials(&email, &payload.password);
    if !validation.is_valid {
        return Err(ApiError::ValidationError(validation.first_message()));
    }

    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Signup rejected: duplicate email");
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_password(&payload.password)?;
    let (otp, otp_expiry) = generate_otp(Utc::now());
    let user_id = generate_user_id();

    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, verified, otp, otp_expiry)
        VALUES (?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(&user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&otp)
    .bind(otp_expiry.to_rfc3339())
    .execute(&state.db)
    .await;

    if let Err(e) = insert {
        // A concurrent signup can slip past the SELECT; the store decides
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            warn!(email = %safe_email_log(&email), "Signup lost duplicate race at the store");
            return Err(ApiError::DuplicateEmail);
        }
        return Err(ApiError::DatabaseError(e));
    }

    info!(
        user_id = %user_id,
        email = %safe_email_log(&email),
        "User account created, OTP issued"
    );

    // Mail delivery is best effort; the OTP stays valid in the store and can
    // be resent
    if let Err(e) = state.mail_service.send_otp_email(&email, &otp).await {
        warn!(error = %e, email = %safe_email_log(&email), "Failed to send OTP email");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created. Check your email for the verification code.",
            "email": email,
        })),
    ))
}

/// POST /api/verify/:email
///
/// Consumes the OTP. Failure paths mutate nothing; success flips `verified`
/// and clears both OTP columns in one statement, so a replayed code fails
/// with InvalidOtp.
pub async fn verify_otp(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(email): Path<String>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();
    let email = email.trim().to_lowercase();

    let user: User = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or(ApiError::UnknownUser)?;

    user.check_otp(payload.otp.trim(), Utc::now())?;

    sqlx::query("UPDATE users SET verified = 1, otp = NULL, otp_expiry = NULL WHERE id = ?")
        .bind(&user.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&email),
        "Email verified, OTP cleared"
    );

    Ok(Json(json!({
        "message": "Email verified. You can now log in.",
    })))
}

/// POST /api/resend/:email
///
/// Regenerates the OTP for an unverified account. The previous code is
/// superseded and can no longer be used.
pub async fn resend_otp(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();
    let email = email.trim().to_lowercase();

    let user: User = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or(ApiError::UnknownUser)?;

    if user.verified {
        return Err(ApiError::ValidationError(
            "account is already verified".to_string(),
        ));
    }

    let (otp, otp_expiry) = generate_otp(Utc::now());

    sqlx::query("UPDATE users SET otp = ?, otp_expiry = ? WHERE id = ?")
        .bind(&otp)
        .bind(otp_expiry.to_rfc3339())
        .bind(&user.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if let Err(e) = state.mail_service.send_otp_email(&email, &otp).await {
        warn!(error = %e, email = %safe_email_log(&email), "Failed to send OTP email");
    }

    info!(user_id = %user.id, "OTP regenerated and resent");

    Ok(Json(json!({
        "message": "A new verification code has been sent.",
    })))
}

/// POST /api/login
///
/// Unknown email and wrong password are indistinguishable to the caller.
/// A correct password on an unverified account fails with NotVerified and
/// never establishes a session.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let email = payload.email.trim().to_lowercase();

    let user: User = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %safe_email_log(&email), "Login failed: bad password");
        return Err(ApiError::InvalidCredentials);
    }

    if !user.verified {
        warn!(email = %safe_email_log(&email), "Login refused: account not verified");
        return Err(ApiError::NotVerified);
    }

    let session_id = generate_session_id();
    sqlx::query("INSERT INTO sessions (id, user_id, email) VALUES (?, ?, ?)")
        .bind(&session_id)
        .bind(&user.id)
        .bind(&user.email)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&email),
        "Login successful, session established"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        set_session_cookie(&session_id)
            .parse()
            .map_err(|_| ApiError::InternalServer("cookie encoding failed".to_string()))?,
    );

    Ok((
        headers,
        Json(json!({
            "message": "Login successful",
            "user": { "id": user.id, "email": user.email },
        })),
    ))
}

/// POST /api/logout
///
/// Idempotent: deletes the session row if one exists and always clears the
/// cookie.
pub async fn logout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    request_headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if let Some(session_id) = session_cookie_value(&request_headers) {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(&session_id)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;
    }

    info!("User logout");

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        clear_session_cookie()
            .parse()
            .map_err(|_| ApiError::InternalServer("cookie encoding failed".to_string()))?,
    );

    Ok((headers, Json(json!({ "message": "Logout successful" }))))
}

/// GET /api/me
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user: User = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&session.user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::Unauthorized("user no longer exists".to_string()))?;

    Ok(Json(json!({
        "user": { "id": user.id, "email": user.email, "verified": user.verified },
    })))
}
