//! # News Proxy
//!
//! Proxies the third-party news search API with an in-memory cache
//! (5 minute TTL) so repeated searches don't burn the upstream quota.

use moka::future::Cache;
use shop_core::{ApiError, ApiResult};
use std::time::Duration;
use tracing::{debug, error};

const CACHE_TTL: Duration = Duration::from_secs(300);
const PAGE_SIZE: u32 = 20;

/// Client for the news search API, with response caching
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    cache: Cache<String, serde_json::Value>,
}

impl NewsClient {
    /// Build from `NEWS_API_KEY`; a missing key leaves the proxy
    /// disabled rather than failing startup.
    pub fn from_env() -> Self {
        Self::new(std::env::var("NEWS_API_KEY").ok())
    }

    pub fn new(api_key: Option<String>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: "https://newsapi.org".to_string(),
            cache,
        }
    }

    /// Builder: point at a different upstream (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Search the news API, serving repeats from cache
    pub async fn search(&self, query: &str, page: u32) -> ApiResult<serde_json::Value> {
        let Some(ref api_key) = self.api_key else {
            return Err(ApiError::Config("NEWS_API_KEY not set".to_string()));
        };

        let key = format!("{query}:{page}");
        if let Some(cached) = self.cache.get(&key).await {
            debug!("news cache hit: {key}");
            return Ok(cached);
        }

        let url = format!("{}/v2/everything", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("page", &page.to_string()),
                ("pageSize", &PAGE_SIZE.to_string()),
            ])
            .header("X-Api-Key", api_key)
            .send()
            .await
            .map_err(|e| {
                error!("news upstream unreachable: {e}");
                ApiError::upstream(e)
            })?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(ApiError::upstream)?;

        if !status.is_success() {
            error!("news upstream error: status={status}, body={body}");
            return Err(ApiError::Internal(format!(
                "news upstream returned status {status}"
            )));
        }

        self.cache.insert(key, body.clone()).await;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_is_cached() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "tea"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok", "articles": []
            })))
            .expect(1) // second call must come from cache
            .mount(&server)
            .await;

        let client = NewsClient::new(Some("news-key".into())).with_base_url(server.uri());

        let first = client.search("tea", 1).await.unwrap();
        let second = client.search("tea", 1).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = NewsClient::new(None);
        let err = client.search("tea", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
