// src/services/search.rs
//! External web search provider client (Google Programmable Search)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Bounded timeout on every provider call so a slow provider cannot hang the
/// request thread.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum results requested from the provider per query
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider credentials not configured")]
    NotConfigured,

    #[error("search provider timed out")]
    Timeout,

    #[error("search provider request failed: {0}")]
    Provider(String),
}

/// One ranked search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Web search service backed by the Google Custom Search JSON API
#[derive(Debug, Clone)]
pub struct SearchService {
    http: Client,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl SearchService {
    pub fn new(http: Client, api_key: Option<String>, engine_id: Option<String>) -> Self {
        Self {
            http,
            api_key,
            engine_id,
        }
    }

    /// Run a keyword search, returning at most [`MAX_RESULTS`] items.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchItem>, SearchError> {
        let (api_key, engine_id) = match (&self.api_key, &self.engine_id) {
            (Some(k), Some(e)) => (k, e),
            _ => {
                warn!("search requested but provider credentials are not configured");
                return Err(SearchError::NotConfigured);
            }
        };

        let url = format!(
            "https://www.googleapis.com/customsearch/v1?key={}&cx={}&q={}&num={}",
            api_key,
            engine_id,
            urlencoding::encode(query),
            MAX_RESULTS
        );

        debug!(query = %query, "Calling search provider");

        let response = self
            .http
            .get(&url)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(query = %query, "Search provider timed out");
                    SearchError::Timeout
                } else {
                    error!(error = %e, query = %query, "HTTP error contacting search provider");
                    SearchError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(http_status = %status, query = %query, "Search provider returned error status");
            return Err(SearchError::Provider(format!(
                "provider returned {}",
                status
            )));
        }

        let body: CseResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse search provider response");
            SearchError::Provider("malformed provider response".to_string())
        })?;

        let items: Vec<SearchItem> = body
            .items
            .into_iter()
            .take(MAX_RESULTS)
            .map(|i| SearchItem {
                title: i.title,
                snippet: i.snippet,
                link: i.link,
            })
            .collect();

        debug!(query = %query, count = items.len(), "Search provider returned results");

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_without_credentials_is_not_configured() {
        let service = SearchService::new(Client::new(), None, None);
        let result = service.search("octopus").await;
        assert!(matches!(result, Err(SearchError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_search_with_partial_credentials_is_not_configured() {
        let service = SearchService::new(Client::new(), Some("key".to_string()), None);
        let result = service.search("octopus").await;
        assert!(matches!(result, Err(SearchError::NotConfigured)));
    }

    #[test]
    fn test_cse_response_parsing_tolerates_missing_fields() {
        let body = r#"{"items":[{"title":"Octopus","link":"https://example.com"}]}"#;
        let parsed: CseResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].snippet, "");
    }

    #[test]
    fn test_cse_response_parsing_without_items() {
        let parsed: CseResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}
