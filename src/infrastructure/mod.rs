//! Infrastructure layer - external service clients and stage implementations

pub mod agents;
pub mod embedding;
pub mod http;
pub mod llm;
pub mod observability;
pub mod pipeline;
pub mod retrieval;
pub mod websearch;

pub use agents::{
    LlmContextCompressor, LlmDiagnosisSynthesizer, LlmFaithfulnessVerifier, LlmQueryDecomposer,
    LlmRelevanceGrader,
};
pub use embedding::OpenAiEmbedder;
pub use http::{HttpClient, HttpClientTrait, RetryPolicy, RetryingHttpClient};
pub use llm::OpenAiProvider;
pub use pipeline::{DiagnosisPipeline, PipelineConfig};
pub use retrieval::{InMemoryDocumentStore, QdrantDocumentStore};
pub use websearch::TavilySearch;
