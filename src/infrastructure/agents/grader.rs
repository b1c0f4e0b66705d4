//! LLM-backed relevance grading

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::prompts::RELEVANCE_GRADER_PROMPT;
use crate::domain::{DomainError, LlmProvider, LlmRequest, RelevanceGrader, RelevanceVerdict};

/// Grades one (sub-query, passage) pair per call
#[derive(Debug)]
pub struct LlmRelevanceGrader<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
}

impl<P: LlmProvider> LlmRelevanceGrader<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraderOutput {
    is_relevant: bool,
    reason: Option<String>,
}

#[async_trait]
impl<P: LlmProvider> RelevanceGrader for LlmRelevanceGrader<P> {
    async fn grade(
        &self,
        subquery: &str,
        passage: &str,
    ) -> Result<RelevanceVerdict, DomainError> {
        let prompt = RELEVANCE_GRADER_PROMPT
            .replace("${document}", passage)
            .replace("${question}", subquery);

        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(0.0)
            .max_tokens(150)
            .json_output(true)
            .build();

        let response = self.provider.complete(&self.model, request).await?;
        let output: GraderOutput = super::parse_structured("grading", response.content())?;

        let mut verdict = if output.is_relevant {
            RelevanceVerdict::relevant()
        } else {
            RelevanceVerdict::not_relevant()
        };

        if let Some(reason) = output.reason {
            verdict = verdict.with_reason(reason);
        }

        Ok(verdict)
    }
}
