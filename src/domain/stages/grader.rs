//! Relevance grading contract

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Verdict for a single (sub-query, passage) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    pub is_relevant: bool,
    /// Explanation from the grader, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RelevanceVerdict {
    pub fn relevant() -> Self {
        Self {
            is_relevant: true,
            reason: None,
        }
    }

    pub fn not_relevant() -> Self {
        Self {
            is_relevant: false,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Classifies whether one retrieved passage is relevant to one sub-query.
///
/// Pairs are graded independently; there is no cross-pair dependency, so
/// callers are free to grade an entire batch concurrently.
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    async fn grade(&self, subquery: &str, passage: &str)
        -> Result<RelevanceVerdict, DomainError>;
}
