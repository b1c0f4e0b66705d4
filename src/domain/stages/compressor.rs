//! Context compression contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::retrieval::Passage;
use crate::domain::DomainError;

/// Rewrites a sub-query's retrieved passages into a smaller set of concise,
/// attributed summaries anchored to that sub-query.
///
/// The returned passages replace the input set entirely; implementations
/// keep a source locator on every summary they emit.
#[async_trait]
pub trait ContextCompressor: Send + Sync + Debug {
    async fn compress(
        &self,
        subquery: &str,
        passages: &[Passage],
    ) -> Result<Vec<Passage>, DomainError>;
}
