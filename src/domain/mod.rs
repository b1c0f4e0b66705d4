//! Domain layer - contracts, entities, and the pipeline state machine

pub mod embedding;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod retrieval;
pub mod stages;
pub mod websearch;

pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use pipeline::{DiagnosisOutcome, PipelineError, PipelineStage, PipelineState, Termination};
pub use retrieval::{DocumentStore, Passage, ScoredPassage, SubqueryEvidence};
pub use stages::{
    ContextCompressor, DiagnosisAnswer, DiagnosisSynthesizer, FaithfulnessVerifier,
    QueryDecomposer, RelevanceGrader, RelevanceVerdict, VerificationReport,
};
pub use websearch::{WebSearchHit, WebSearchTool};
