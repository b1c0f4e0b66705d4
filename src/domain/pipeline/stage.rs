//! Pipeline stages and the transition function

use serde::{Deserialize, Serialize};

use super::state::PipelineState;

/// Stages of a diagnosis run.
///
/// The run starts in `Decompose` and always reaches `End`: the only cycle,
/// `Generate -> Verify -> Generate`, is bounded by the retry budget, which
/// shrinks on every `Verify` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Decompose,
    Retrieve,
    Filter,
    FallbackSearch,
    Compress,
    Generate,
    Verify,
    End,
}

impl PipelineStage {
    /// Next stage given the state produced by executing this stage
    pub fn next(&self, state: &PipelineState) -> PipelineStage {
        match self {
            Self::Decompose => Self::Retrieve,
            Self::Retrieve => Self::Filter,
            Self::Filter => {
                if state.needs_fallback {
                    Self::FallbackSearch
                } else {
                    Self::Compress
                }
            }
            Self::FallbackSearch => Self::Compress,
            Self::Compress => Self::Generate,
            Self::Generate => Self::Verify,
            Self::Verify => {
                if state.is_ungrounded && state.retry_budget > 0 {
                    Self::Generate
                } else {
                    Self::End
                }
            }
            Self::End => Self::End,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Decompose => "decompose",
            Self::Retrieve => "retrieve",
            Self::Filter => "filter",
            Self::FallbackSearch => "fallback_search",
            Self::Compress => "compress",
            Self::Generate => "generate",
            Self::Verify => "verify",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PipelineState {
        PipelineState::new("assessment", 3)
    }

    #[test]
    fn test_linear_transitions() {
        let s = state();
        assert_eq!(PipelineStage::Decompose.next(&s), PipelineStage::Retrieve);
        assert_eq!(PipelineStage::Retrieve.next(&s), PipelineStage::Filter);
        assert_eq!(
            PipelineStage::FallbackSearch.next(&s),
            PipelineStage::Compress
        );
        assert_eq!(PipelineStage::Compress.next(&s), PipelineStage::Generate);
        assert_eq!(PipelineStage::Generate.next(&s), PipelineStage::Verify);
    }

    #[test]
    fn test_filter_branches_on_fallback_flag() {
        let mut s = state();
        s.needs_fallback = true;
        assert_eq!(PipelineStage::Filter.next(&s), PipelineStage::FallbackSearch);

        s.needs_fallback = false;
        assert_eq!(PipelineStage::Filter.next(&s), PipelineStage::Compress);
    }

    #[test]
    fn test_verify_retries_while_budget_remains() {
        let mut s = state();
        s.is_ungrounded = true;
        s.retry_budget = 2;
        assert_eq!(PipelineStage::Verify.next(&s), PipelineStage::Generate);
    }

    #[test]
    fn test_verify_ends_when_budget_exhausted() {
        let mut s = state();
        s.is_ungrounded = true;
        s.retry_budget = 0;
        assert_eq!(PipelineStage::Verify.next(&s), PipelineStage::End);
    }

    #[test]
    fn test_verify_ends_when_grounded() {
        let mut s = state();
        s.is_ungrounded = false;
        s.retry_budget = 3;
        assert_eq!(PipelineStage::Verify.next(&s), PipelineStage::End);
    }

    #[test]
    fn test_end_is_terminal() {
        let s = state();
        assert!(PipelineStage::End.is_terminal());
        assert_eq!(PipelineStage::End.next(&s), PipelineStage::End);
    }
}
