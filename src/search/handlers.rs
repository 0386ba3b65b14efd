//! Keyword search handlers

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::common::{ApiError, AppState};
use crate::services::SearchError;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NotConfigured => {
                ApiError::ExternalApiError("search provider not configured".to_string())
            }
            SearchError::Timeout => {
                ApiError::ExternalApiError("search provider timed out".to_string())
            }
            SearchError::Provider(msg) => ApiError::ExternalApiError(msg),
        }
    }
}

/// GET /api/search?q=
///
/// Pass-through to the external search provider; returns
/// `{items: [{title, snippet, link}]}`.
pub async fn api_search(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::ValidationError(
            "q: query must not be empty".to_string(),
        ));
    }

    let items = state.search_service.search(query).await?;

    info!(query = %query, count = items.len(), "Search completed");

    Ok(Json(json!({ "items": items })))
}
