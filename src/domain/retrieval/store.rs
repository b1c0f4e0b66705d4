//! Document store contract

use std::fmt::Debug;

use async_trait::async_trait;

use super::passage::ScoredPassage;
use crate::domain::DomainError;

/// Similarity-search service over the evidence corpus.
///
/// Implementations wrap a specific vector database and return the top-k
/// nearest passages for a query, ordered by similarity rank.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, DomainError>;
}
