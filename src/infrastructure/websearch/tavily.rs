//! Tavily web search client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{DomainError, WebSearchHit, WebSearchTool};
use crate::infrastructure::http::HttpClientTrait;

const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Web search tool backed by the Tavily API
#[derive(Debug)]
pub struct TavilySearch<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    max_results: usize,
}

impl<C: HttpClientTrait> TavilySearch<C> {
    pub fn new(client: C, api_key: impl Into<String>, max_results: usize) -> Self {
        Self::with_base_url(client, api_key, max_results, DEFAULT_TAVILY_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        max_results: usize,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    content: String,
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchTool for TavilySearch<C> {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchHit>, DomainError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });

        let headers = vec![("Content-Type", "application/json")];
        let json = self.client.post_json(&self.search_url(), headers, &body).await?;

        let response: TavilyResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("tavily", format!("Unexpected response: {}", e))
        })?;

        debug!("Tavily returned {} results", response.results.len());

        Ok(response
            .results
            .into_iter()
            .take(self.max_results)
            .map(|r| WebSearchHit::new(r.url, r.content))
            .collect())
    }
}
