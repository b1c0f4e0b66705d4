//! LLM-backed diagnosis synthesis

use std::sync::Arc;

use async_trait::async_trait;

use super::prompts::{SYNTHESIZER_SYSTEM_PROMPT, SYNTHESIZER_USER_PROMPT};
use crate::domain::retrieval::SubqueryEvidence;
use crate::domain::{DiagnosisAnswer, DiagnosisSynthesizer, DomainError, LlmProvider, LlmRequest};

/// Produces the structured differential diagnosis from the evidence bundle
#[derive(Debug)]
pub struct LlmDiagnosisSynthesizer<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    temperature: f32,
}

impl<P: LlmProvider> LlmDiagnosisSynthesizer<P> {
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

    fn render_context(context: &[SubqueryEvidence]) -> String {
        context
            .iter()
            .map(|entry| {
                let docs: Vec<String> = entry
                    .passages
                    .iter()
                    .map(|p| format!("source: {}\ncontent: {}", p.source, p.content))
                    .collect();
                format!(
                    "Subquery:\n{}\n\nDocuments:\n{}",
                    entry.subquery,
                    docs.join("\n\n---\n\n")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n***\n\n")
    }
}

#[async_trait]
impl<P: LlmProvider> DiagnosisSynthesizer for LlmDiagnosisSynthesizer<P> {
    async fn synthesize(
        &self,
        main_query: &str,
        context: &[SubqueryEvidence],
    ) -> Result<DiagnosisAnswer, DomainError> {
        let user = SYNTHESIZER_USER_PROMPT
            .replace("${context}", &Self::render_context(context))
            .replace("${question}", main_query);

        let request = LlmRequest::builder()
            .system(SYNTHESIZER_SYSTEM_PROMPT)
            .user(user)
            .temperature(self.temperature)
            .json_output(true)
            .build();

        let response = self.provider.complete(&self.model, request).await?;

        super::parse_structured("synthesis", response.content())
    }
}
