//! LLM-backed query decomposition

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::prompts::{DECOMPOSER_SYSTEM_PROMPT, DECOMPOSER_USER_PROMPT};
use crate::domain::{DomainError, LlmProvider, LlmRequest, QueryDecomposer};

/// Translates the clinical assessment into retrieval sub-queries
#[derive(Debug)]
pub struct LlmQueryDecomposer<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    temperature: f32,
}

impl<P: LlmProvider> LlmQueryDecomposer<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.5,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DecomposerOutput {
    subqueries: Vec<String>,
}

#[async_trait]
impl<P: LlmProvider> QueryDecomposer for LlmQueryDecomposer<P> {
    async fn decompose(&self, main_query: &str) -> Result<Vec<String>, DomainError> {
        let user = DECOMPOSER_USER_PROMPT.replace("${main_query}", main_query);

        let request = LlmRequest::builder()
            .system(DECOMPOSER_SYSTEM_PROMPT)
            .user(user)
            .temperature(self.temperature)
            .json_output(true)
            .build();

        let response = self.provider.complete(&self.model, request).await?;
        let output: DecomposerOutput = super::parse_structured("decomposer", response.content())?;

        // Drop whitespace-only entries; the orchestrator treats an empty
        // set as a failed decomposition
        let subqueries: Vec<String> = output
            .subqueries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        debug!("Decomposed assessment into {} sub-queries", subqueries.len());

        Ok(subqueries)
    }
}
