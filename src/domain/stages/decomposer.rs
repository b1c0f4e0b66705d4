//! Query decomposition contract

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Splits one clinical assessment into focused retrieval sub-queries.
///
/// Each sub-query must be self-contained and usable on its own as a
/// similarity-search query. Implementations return the sub-queries in the
/// order they were produced; downstream report numbering follows that order.
#[async_trait]
pub trait QueryDecomposer: Send + Sync + Debug {
    async fn decompose(&self, main_query: &str) -> Result<Vec<String>, DomainError>;
}
