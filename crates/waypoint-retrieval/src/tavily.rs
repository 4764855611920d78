// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Tavily search API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use waypoint_config::model::TavilyConfig;
use waypoint_core::{
    AdapterType, HealthStatus, PluginAdapter, SearchDepth, SearchProvider, SearchResult,
    WaypointError,
};

const SERVICE: &str = "tavily";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// [`SearchProvider`] backed by `POST {base_url}/search`.
#[derive(Debug, Clone)]
pub struct TavilyProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TavilyProvider {
    /// Fails with a configuration error when no API key is set.
    pub fn new(config: &TavilyConfig) -> Result<Self, WaypointError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| WaypointError::Config("tavily.api_key is not set".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| WaypointError::Config(format!("invalid Tavily API key: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WaypointError::external(SERVICE, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for TavilyProvider {
    fn name(&self) -> &str {
        SERVICE
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, WaypointError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, WaypointError> {
        let request = SearchRequest {
            query,
            search_depth: depth,
            max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| WaypointError::external(SERVICE, e))?;

        let status = response.status();
        debug!(status = %status, "tavily response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WaypointError::external_msg(
                SERVICE,
                format!("API returned {status}: {body}"),
            ));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| WaypointError::external(SERVICE, e))?;
        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn provider(base_url: &str) -> TavilyProvider {
        TavilyProvider::new(&TavilyConfig {
            api_key: Some("tvly-test".into()),
            base_url: base_url.to_string(),
            ..TavilyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn missing_key_is_config_error() {
        let err = TavilyProvider::new(&TavilyConfig::default()).unwrap_err();
        assert!(matches!(err, WaypointError::Config(_)));
    }

    #[tokio::test]
    async fn search_posts_query_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_json(serde_json::json!({
                "query": "rust 2024 edition",
                "search_depth": "advanced",
                "max_results": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "rust 2024 edition",
                "results": [
                    {"title": "Rust 2024", "content": "Stabilized.", "url": "https://r.example", "score": 0.97},
                    {"title": "Edition guide", "content": "Migration.", "url": "https://g.example"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = provider(&server.uri())
            .search("rust 2024 edition", SearchDepth::Advanced, 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Rust 2024");
        assert_eq!(results[0].score, 0.97);
        assert_eq!(results[1].score, 0.0);
    }

    #[tokio::test]
    async fn error_status_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(432).set_body_string("usage limit exceeded"))
            .mount(&server)
            .await;

        let err = provider(&server.uri())
            .search("q", SearchDepth::Basic, 3)
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("usage limit exceeded"), "got: {err}");
    }

    #[tokio::test]
    async fn missing_results_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let results = provider(&server.uri())
            .search("q", SearchDepth::Basic, 3)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
