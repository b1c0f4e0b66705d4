//! Web search contract used for fallback evidence retrieval

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchHit {
    pub url: String,
    pub content: String,
}

impl WebSearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}

/// General web search tool, bounded result count per query
#[async_trait]
pub trait WebSearchTool: Send + Sync + Debug {
    async fn search(&self, query: &str) -> Result<Vec<WebSearchHit>, DomainError>;
}


#[cfg(test)]
pub use mock::MockWebSearchTool;
