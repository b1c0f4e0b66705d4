//! Fatal run-level errors
//!
//! Grading failures are recovered at their stage boundary and never surface
//! here; retry exhaustion is a reported outcome, not an error.

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that abort a diagnosis run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The decomposer produced no usable sub-queries, or the call failed
    #[error("decompose stage failed: {reason}")]
    Decomposition { reason: String },

    /// A similarity-search call errored; retrieval is fatal, no partial runs
    #[error("retrieve stage failed for sub-query {index}: {source}")]
    Retrieval {
        index: usize,
        #[source]
        source: DomainError,
    },

    /// A sub-query still has zero passages after fallback search
    #[error("fallback_search stage left sub-query without evidence: {subquery}")]
    InsufficientEvidence { subquery: String },

    /// A context-compression call errored
    #[error("compress stage failed for sub-query {index}: {source}")]
    Compression {
        index: usize,
        #[source]
        source: DomainError,
    },

    /// The synthesizer call errored; no fallback to a template answer
    #[error("generate stage failed: {source}")]
    Generation {
        #[source]
        source: DomainError,
    },
}

impl PipelineError {
    /// Name of the stage the run failed in
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decomposition { .. } => "decompose",
            Self::Retrieval { .. } => "retrieve",
            Self::InsufficientEvidence { .. } => "fallback_search",
            Self::Compression { .. } => "compress",
            Self::Generation { .. } => "generate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_name_their_stage() {
        let err = PipelineError::Decomposition {
            reason: "no sub-queries produced".to_string(),
        };
        assert_eq!(err.stage(), "decompose");
        assert!(err.to_string().contains("decompose"));

        let err = PipelineError::InsufficientEvidence {
            subquery: "gait deviations".to_string(),
        };
        assert_eq!(err.stage(), "fallback_search");
        assert!(err.to_string().contains("gait deviations"));

        let err = PipelineError::Retrieval {
            index: 2,
            source: DomainError::document_store("connection refused"),
        };
        assert_eq!(err.stage(), "retrieve");
        assert!(err.to_string().contains("sub-query 2"));
    }
}
