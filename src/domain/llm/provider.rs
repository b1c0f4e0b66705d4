use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a completion request
    async fn complete(&self, model: &str, request: LlmRequest)
        -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
