//! Conversion routes

use axum::{routing::post, Router};

use super::handlers;

/// # Routes
/// - `POST /convert/jpg-to-pdf` - Image upload to single-page PDF
/// - `POST /convert/pdf-to-jpg` - First PDF page to JPEG
/// - `POST /convert/word-to-pdf` - DOCX text to PDF
/// - `POST /convert/pdf-to-word` - PDF text to DOCX
pub fn convert_routes() -> Router {
    Router::new()
        .route("/convert/jpg-to-pdf", post(handlers::convert_jpg_to_pdf))
        .route("/convert/pdf-to-jpg", post(handlers::convert_pdf_to_jpg))
        .route("/convert/word-to-pdf", post(handlers::convert_word_to_pdf))
        .route("/convert/pdf-to-word", post(handlers::convert_pdf_to_word))
}
