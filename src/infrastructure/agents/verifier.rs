//! LLM-backed faithfulness verification

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::prompts::VERIFIER_PROMPT;
use crate::domain::stages::{ClaimVerdict, Confidence, Hallucination, VerificationReport};
use crate::domain::{DomainError, FaithfulnessVerifier, LlmProvider, LlmRequest};

/// Scores a synthesized answer against the serialized evidence context
#[derive(Debug)]
pub struct LlmFaithfulnessVerifier<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
}

impl<P: LlmProvider> LlmFaithfulnessVerifier<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifierOutput {
    grounded_score: f64,
    confidence: Option<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    claims: Vec<ClaimVerdict>,
    #[serde(default)]
    hallucinations: Vec<Hallucination>,
}

fn parse_confidence(raw: Option<&str>) -> Confidence {
    match raw.map(str::to_lowercase).as_deref() {
        Some("high") => Confidence::High,
        Some("moderate") | Some("medium") => Confidence::Moderate,
        _ => Confidence::Low,
    }
}

#[async_trait]
impl<P: LlmProvider> FaithfulnessVerifier for LlmFaithfulnessVerifier<P> {
    async fn verify(
        &self,
        context: &str,
        answer: &str,
    ) -> Result<VerificationReport, DomainError> {
        let prompt = VERIFIER_PROMPT
            .replace("${facts}", context)
            .replace("${answer}", answer);

        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(0.0)
            .json_output(true)
            .build();

        let response = self.provider.complete(&self.model, request).await?;
        let output: VerifierOutput = super::parse_structured("verification", response.content())?;

        Ok(VerificationReport {
            grounded_score: output.grounded_score.clamp(0.0, 1.0),
            confidence: parse_confidence(output.confidence.as_deref()),
            summary: output.summary,
            claims: output.claims,
            hallucinations: output.hallucinations,
        })
    }
}
