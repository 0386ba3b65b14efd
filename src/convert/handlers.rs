//! File conversion handlers
//!
//! Each route accepts a single multipart field named `file`, runs the
//! conversion on the blocking pool, stores the result under the converted
//! directory and streams it back as an attachment. The stored name carries a
//! fresh F_ id so concurrent conversions of equally-named uploads never
//! collide.

use axum::{
    extract::{Extension, Multipart},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::converters::{ConversionKind, ConvertError};
use crate::auth::SessionUser;
use crate::common::id_generator::generate_file_id;
use crate::common::{sanitize_filename, split_extension, ApiError, AppState};

impl From<ConvertError> for ApiError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::Engine(msg) => ApiError::InternalServer(msg),
            other => ApiError::ConversionError(other.to_string()),
        }
    }
}

pub async fn convert_jpg_to_pdf(
    state: Extension<Arc<RwLock<AppState>>>,
    session: Option<SessionUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    run_conversion(ConversionKind::JpgToPdf, state, session, multipart).await
}

pub async fn convert_pdf_to_jpg(
    state: Extension<Arc<RwLock<AppState>>>,
    session: Option<SessionUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    run_conversion(ConversionKind::PdfToJpg, state, session, multipart).await
}

pub async fn convert_word_to_pdf(
    state: Extension<Arc<RwLock<AppState>>>,
    session: Option<SessionUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    run_conversion(ConversionKind::WordToPdf, state, session, multipart).await
}

pub async fn convert_pdf_to_word(
    state: Extension<Arc<RwLock<AppState>>>,
    session: Option<SessionUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    run_conversion(ConversionKind::PdfToWord, state, session, multipart).await
}

async fn run_conversion(
    kind: ConversionKind,
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    session: Option<SessionUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let (filename, data) = read_upload(multipart, state.max_upload_bytes).await?;

    info!(
        kind = kind.as_str(),
        filename = %filename,
        size = data.len(),
        "Conversion requested"
    );

    // Keep the upload around as scratch input for debugging failed jobs
    let file_id = generate_file_id();
    let upload_path = state.uploads_dir.join(format!("{}_{}", file_id, filename));
    if let Err(e) = tokio::fs::write(&upload_path, &data).await {
        warn!(error = %e, "Could not persist uploaded file");
    }

    let output = tokio::task::spawn_blocking(move || kind.convert(&data))
        .await
        .map_err(|e| {
            error!(error = %e, "Conversion task panicked");
            ApiError::InternalServer("conversion task failed".to_string())
        })??;

    let (stem, _) = split_extension(&filename);
    let output_filename = format!("{}_{}.{}", stem, file_id, kind.output_extension());
    let output_path = state.converted_dir.join(&output_filename);
    tokio::fs::write(&output_path, &output)
        .await
        .map_err(|e| {
            error!(error = %e, path = %output_path.display(), "Could not write converted file");
            ApiError::InternalServer("could not store converted file".to_string())
        })?;

    let user_id = session.as_ref().map(|s| s.user_id.as_str());
    sqlx::query(
        "INSERT INTO conversions (id, user_id, kind, source_filename, output_filename) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&file_id)
    .bind(user_id)
    .bind(kind.as_str())
    .bind(&filename)
    .bind(&output_filename)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(
        kind = kind.as_str(),
        file_id = %file_id,
        output = %output_filename,
        size = output.len(),
        "Conversion completed"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(kind.output_content_type()),
    );
    let disposition = format!("attachment; filename=\"{}\"", output_filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ApiError::InternalServer("invalid output filename".to_string()))?,
    );

    Ok((StatusCode::OK, headers, output))
}

/// Pull the `file` field out of the multipart body
async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Malformed multipart upload");
        ApiError::ValidationError("file: malformed upload".to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = sanitize_filename(field.file_name().unwrap_or("upload"));

        // Only the body-limit rejection is a 413; a dropped connection or
        // malformed framing is the client's problem, not a size problem
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                warn!("Upload rejected by the body limit");
                ApiError::PayloadTooLarge
            } else {
                warn!(error = %e, "Failed reading upload body");
                ApiError::ValidationError("file: malformed upload".to_string())
            }
        })?;

        if data.is_empty() {
            return Err(ApiError::ValidationError(
                "file: uploaded file is empty".to_string(),
            ));
        }
        if data.len() > max_bytes {
            warn!(size = data.len(), limit = max_bytes, "Upload over size limit");
            return Err(ApiError::PayloadTooLarge);
        }

        return Ok((filename, data.to_vec()));
    }

    Err(ApiError::ValidationError(
        "file: missing multipart field".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "qs-test-boundary";

    fn upload_request(field_name: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                field_name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn multipart(req: Request<Body>) -> Multipart {
        Multipart::from_request(req, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_read_upload_returns_field_contents() {
        let mp = multipart(upload_request("file", "photo.jpg", b"image bytes")).await;
        let (filename, data) = read_upload(mp, 1024).await.unwrap();
        assert_eq!(filename, "photo.jpg");
        assert_eq!(data, b"image bytes".to_vec());
    }

    #[tokio::test]
    async fn test_read_upload_over_limit_is_payload_too_large() {
        let mp = multipart(upload_request("file", "big.pdf", &[0u8; 64])).await;
        let result = read_upload(mp, 16).await;
        assert!(matches!(result, Err(ApiError::PayloadTooLarge)));
    }

    #[tokio::test]
    async fn test_read_upload_missing_file_field_is_validation_error() {
        let mp = multipart(upload_request("attachment", "x.bin", b"data")).await;
        let result = read_upload(mp, 1024).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_read_upload_empty_file_is_validation_error() {
        let mp = multipart(upload_request("file", "empty.pdf", b"")).await;
        let result = read_upload(mp, 1024).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_read_upload_sanitizes_traversal_filenames() {
        let mp = multipart(upload_request("file", "../../etc/passwd", b"data")).await;
        let (filename, _) = read_upload(mp, 1024).await.unwrap();
        assert_eq!(filename, "passwd");
    }
}
