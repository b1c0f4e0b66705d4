//! Embedding provider implementations

pub mod openai;

pub use openai::OpenAiEmbedder;
