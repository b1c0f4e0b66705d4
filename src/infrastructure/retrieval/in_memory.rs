//! In-memory document store
//!
//! Token-overlap scoring stands in for embedding distance; intended for
//! offline runs and tests, not production retrieval quality.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{DomainError, DocumentStore, Passage, ScoredPassage};

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    passages: Vec<Passage>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passages(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn add(&mut self, passage: Passage) {
        self.passages.push(passage);
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    fn tokens(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 2)
            .map(String::from)
            .collect()
    }

    fn overlap_score(query_tokens: &HashSet<String>, passage: &Passage) -> f32 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let passage_tokens = Self::tokens(&passage.content);
        let shared = query_tokens.intersection(&passage_tokens).count();

        shared as f32 / query_tokens.len() as f32
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, DomainError> {
        let query_tokens = Self::tokens(query);

        let mut scored: Vec<ScoredPassage> = self
            .passages
            .iter()
            .map(|p| ScoredPassage {
                passage: p.clone(),
                score: Self::overlap_score(&query_tokens, p),
            })
            .filter(|sp| sp.score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }
}
