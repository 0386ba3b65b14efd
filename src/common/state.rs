// Application state shared across all modules

use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::services::{MailService, SearchService};

/// Application state containing database pool, services, and configuration
///
/// Constructed once in `main` and passed to handlers through an Extension.
/// The HTTP client lives inside `SearchService`; there is no other shared
/// mutable state and each request is independent.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub uploads_dir: PathBuf,
    pub converted_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub search_service: Arc<SearchService>,
    pub mail_service: Arc<MailService>,
}
