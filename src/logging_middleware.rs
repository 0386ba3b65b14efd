// src/logging_middleware.rs
//! Middleware for logging JSON request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Multipart uploads and binary downloads are skipped; buffering a 20 MiB
/// document to pretty-print it would be wasted work.
fn is_loggable(headers: &HeaderMap) -> bool {
    match headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(ct) => ct.starts_with("application/json") || ct.starts_with("text/"),
        None => true,
    }
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let request = if is_loggable(request.headers()) {
        let (parts, body) = request.into_parts();

        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if !bytes.is_empty() {
            if let Ok(body_str) = std::str::from_utf8(&bytes) {
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
                    debug!(
                        method = %parts.method,
                        uri = %parts.uri,
                        request_body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                        "📥 Request"
                    );
                } else {
                    debug!(
                        method = %parts.method,
                        uri = %parts.uri,
                        request_body = %body_str,
                        "📥 Request"
                    );
                }
            }
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        debug!(
            method = %request.method(),
            uri = %request.uri(),
            "📥 Request (body not logged)"
        );
        request
    };

    let response = next.run(request).await;

    if !is_loggable(response.headers()) {
        debug!(status = %response.status(), "📤 Response (body not logged)");
        return Ok(response);
    }

    let (parts, body) = response.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Ok(body_str) = std::str::from_utf8(&bytes) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
                debug!(
                    status = %parts.status,
                    response_body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                    "📤 Response"
                );
            } else {
                debug!(
                    status = %parts.status,
                    response_body = %body_str,
                    "📤 Response"
                );
            }
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
