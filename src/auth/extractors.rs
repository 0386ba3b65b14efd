//! Session extractor and cookie helpers
//!
//! The session guard is an explicit extractor at the top of each protected
//! handler rather than wrapping middleware: handlers that need a user declare
//! `SessionUser`, pages that merely adapt to one declare `Option<SessionUser>`.

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::Session;
use crate::common::{safe_email_log, ApiError, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "qs_session";

/// Authenticated user extractor
///
/// Reads the session cookie and loads the matching server-side session row.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub session_id: String,
    pub user_id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let session_id = match session_cookie_value(&parts.headers) {
            Some(id) => id,
            None => {
                warn!("Authentication failed: missing session cookie");
                return Err(ApiError::Unauthorized("not logged in".into()));
            }
        };

        let session: Option<Session> =
            sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
                .bind(&session_id)
                .fetch_optional(&app_state.db)
                .await
                .map_err(ApiError::DatabaseError)?;

        match session {
            Some(s) => {
                debug!(
                    user_id = %s.user_id,
                    email = %safe_email_log(&s.email),
                    "Session authentication successful"
                );
                Ok(SessionUser {
                    session_id: s.id,
                    user_id: s.user_id,
                    email: s.email,
                })
            }
            None => {
                warn!("Authentication failed: session not found");
                Err(ApiError::Unauthorized("session expired".into()))
            }
        }
    }
}

/// Extract the session cookie value from request headers
pub fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// `Set-Cookie` value establishing a session
pub fn set_session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    )
}

/// `Set-Cookie` value clearing the session
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_session_cookie() {
        let headers = headers_with_cookie("qs_session=K_ABC123");
        assert_eq!(
            session_cookie_value(&headers),
            Some("K_ABC123".to_string())
        );
    }

    #[test]
    fn test_extracts_among_multiple_cookies() {
        let headers = headers_with_cookie("theme=dark; qs_session=K_XYZ; lang=en");
        assert_eq!(session_cookie_value(&headers), Some("K_XYZ".to_string()));
    }

    #[test]
    fn test_missing_or_empty_cookie_yields_none() {
        assert_eq!(session_cookie_value(&HeaderMap::new()), None);
        let headers = headers_with_cookie("qs_session=");
        assert_eq!(session_cookie_value(&headers), None);
        let headers = headers_with_cookie("other=value");
        assert_eq!(session_cookie_value(&headers), None);
    }

    #[test]
    fn test_cookie_strings_round_trip() {
        let set = set_session_cookie("K_ABC");
        assert!(set.starts_with("qs_session=K_ABC;"));
        assert!(set.contains("HttpOnly"));

        let clear = clear_session_cookie();
        assert!(clear.contains("Max-Age=0"));
    }
}
