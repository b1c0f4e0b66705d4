//! LLM-backed implementations of the pipeline stage contracts
//!
//! Every agent makes one completion call per invocation and validates the
//! provider's output against a strict per-stage schema immediately; nothing
//! loosely typed crosses into the pipeline.

pub mod compressor;
pub mod decomposer;
pub mod grader;
pub mod prompts;
pub mod synthesizer;
pub mod verifier;

pub use compressor::LlmContextCompressor;
pub use decomposer::LlmQueryDecomposer;
pub use grader::LlmRelevanceGrader;
pub use synthesizer::LlmDiagnosisSynthesizer;
pub use verifier::LlmFaithfulnessVerifier;

use crate::domain::DomainError;

/// Extract a JSON object from a completion (handles markdown code fences)
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find('{') {
        if let Some(end) = text.rfind('}') {
            if start < end {
                return Some(&text[start..=end]);
            }
        }
    }

    None
}

/// Deserialize a completion into a stage output type
pub(crate) fn parse_structured<T: serde::de::DeserializeOwned>(
    stage: &str,
    content: &str,
) -> Result<T, DomainError> {
    let json_str = extract_json(content).unwrap_or(content);

    serde_json::from_str(json_str).map_err(|e| {
        DomainError::validation(format!("Malformed {} output: {} - got: {}", stage, e, content))
    })
}
