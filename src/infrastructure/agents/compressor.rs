//! LLM-backed context compression

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::prompts::{COMPRESSOR_SYSTEM_PROMPT, COMPRESSOR_USER_PROMPT};
use crate::domain::retrieval::Passage;
use crate::domain::{ContextCompressor, DomainError, LlmProvider, LlmRequest};

/// Rewrites one sub-query's passage set into attributed summaries
#[derive(Debug)]
pub struct LlmContextCompressor<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    temperature: f32,
}

impl<P: LlmProvider> LlmContextCompressor<P> {
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

    fn render_documents(passages: &[Passage]) -> String {
        passages
            .iter()
            .map(|p| format!("source: {}\ncontent:\n{}", p.source, p.content))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

#[derive(Debug, Deserialize)]
struct CompressorOutput {
    context_documents: Vec<CompressedDocument>,
}

#[derive(Debug, Deserialize)]
struct CompressedDocument {
    content: String,
    source: String,
}

#[async_trait]
impl<P: LlmProvider> ContextCompressor for LlmContextCompressor<P> {
    async fn compress(
        &self,
        subquery: &str,
        passages: &[Passage],
    ) -> Result<Vec<Passage>, DomainError> {
        let user = COMPRESSOR_USER_PROMPT
            .replace("${documents}", &Self::render_documents(passages))
            .replace("${query}", subquery);

        let request = LlmRequest::builder()
            .system(COMPRESSOR_SYSTEM_PROMPT)
            .user(user)
            .temperature(self.temperature)
            .json_output(true)
            .build();

        let response = self.provider.complete(&self.model, request).await?;
        let output: CompressorOutput = super::parse_structured("compression", response.content())?;

        debug!(
            "Compressed {} passages into {} summaries",
            passages.len(),
            output.context_documents.len()
        );

        Ok(output
            .context_documents
            .into_iter()
            .map(|doc| Passage::new(doc.content, doc.source))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::{LlmResponse, Message};

    fn provider_with_content(content: &str) -> Arc<MockLlmProvider> {
        let response = LlmResponse::new(
            "resp-1".to_string(),
            "gpt-4o".to_string(),
            Message::assistant(content),
        );
        Arc::new(MockLlmProvider::new("mock").with_response(response))
    }

    #[tokio::test]
    async fn test_compress_replaces_passages() {
        let provider = provider_with_content(
            r#"{"context_documents": [
                {"content": "SLR at 45 degrees indicates nerve root involvement", "source": "magee.pdf"}
            ]}"#,
        );
        let compressor = LlmContextCompressor::new(provider, "gpt-4o");

        let originals = vec![
            Passage::new("long goniometry table...", "norkin.pdf"),
            Passage::new("SLR details across several pages...", "magee.pdf"),
        ];

        let compressed = compressor
            .compress("positive SLR meaning", &originals)
            .await
            .unwrap();

        assert_eq!(compressed.len(), 1);
        assert_eq!(compressed[0].source, "magee.pdf");
        assert!(compressed[0].content.contains("nerve root"));
    }

    #[tokio::test]
    async fn test_compress_malformed_output_is_error() {
        let provider = provider_with_content("summaries follow: ...");
        let compressor = LlmContextCompressor::new(provider, "gpt-4o");

        let originals = vec![Passage::new("text", "src")];
        assert!(compressor.compress("q", &originals).await.is_err());
    }

    #[test]
    fn test_render_documents_keeps_sources() {
        let passages = vec![
            Passage::new("first", "a.pdf"),
            Passage::new("second", "b.pdf"),
        ];
        let rendered = LlmContextCompressor::<MockLlmProvider>::render_documents(&passages);

        assert!(rendered.contains("source: a.pdf"));
        assert!(rendered.contains("source: b.pdf"));
        assert!(rendered.contains("---"));
    }
}
