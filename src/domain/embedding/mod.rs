//! Embedding provider contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Maps text to a dense vector for similarity search
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the embedding model name
    fn model_name(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock embedder returning a fixed vector
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        vector: Vec<f32>,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(vector: Vec<f32>) -> Self {
            Self {
                vector,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock_embedder", error));
            }
            Ok(self.vector.clone())
        }

        fn model_name(&self) -> &str {
            "mock-embedding"
        }
    }
}

#[cfg(test)]
pub use mock::MockEmbeddingProvider;
