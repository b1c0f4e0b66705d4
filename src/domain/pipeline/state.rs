//! The mutable record threaded through every pipeline stage

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::retrieval::{Passage, SubqueryEvidence};
use crate::domain::stages::VerificationReport;

/// State of a single diagnosis run.
///
/// Created once per run, threaded linearly through the stages; each stage
/// returns a new state derived from its input state and the external
/// responses it gathered. Bundle entries are keyed by sub-query index and
/// their passage lists are always replaced wholesale, never appended to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Original clinical assessment; immutable once set
    pub main_query: String,
    /// Sub-queries in decomposition order; report numbering follows it
    pub subqueries: Vec<String>,
    /// Sub-query index -> evidence currently backing that sub-query
    pub retrieval_bundle: BTreeMap<usize, SubqueryEvidence>,
    /// True iff at least one sub-query has no relevant passages left
    pub needs_fallback: bool,
    /// Most recently rendered diagnosis report
    pub answer: String,
    /// True iff the last verification judged the answer unsupported
    pub is_ungrounded: bool,
    /// Last verification output, present after the first VERIFY pass
    pub verification_report: Option<VerificationReport>,
    /// Remaining regeneration attempts; decremented once per VERIFY pass
    pub retry_budget: u32,
}

impl PipelineState {
    pub fn new(main_query: impl Into<String>, retry_budget: u32) -> Self {
        Self {
            main_query: main_query.into(),
            subqueries: Vec::new(),
            retrieval_bundle: BTreeMap::new(),
            needs_fallback: false,
            answer: String::new(),
            is_ungrounded: false,
            verification_report: None,
            retry_budget,
        }
    }

    /// Overwrite one sub-query's passage list
    pub fn replace_passages(&mut self, index: usize, passages: Vec<Passage>) {
        if let Some(entry) = self.retrieval_bundle.get_mut(&index) {
            entry.passages = passages;
        }
    }

    /// Recompute the fallback flag from the current passage lists
    pub fn recompute_needs_fallback(&mut self) {
        self.needs_fallback = self.retrieval_bundle.values().any(|entry| entry.is_empty());
    }

    /// Indices of sub-queries whose passage lists are currently empty
    pub fn deficient_subqueries(&self) -> Vec<usize> {
        self.retrieval_bundle
            .iter()
            .filter(|(_, entry)| entry.is_empty())
            .map(|(index, _)| *index)
            .collect()
    }

    /// Evidence bundle in sub-query enumeration order
    pub fn ordered_evidence(&self) -> Vec<SubqueryEvidence> {
        self.retrieval_bundle.values().cloned().collect()
    }

    /// Serialize the bundle for generation and verification, grouping
    /// passages under their sub-query in enumeration order
    pub fn serialized_context(&self) -> String {
        let sections: Vec<String> = self
            .retrieval_bundle
            .values()
            .map(|entry| {
                let passages: Vec<String> = entry
                    .passages
                    .iter()
                    .map(|p| format!("source: {}\ncontent: {}", p.source, p.content))
                    .collect();
                format!(
                    "Subquery:\n{}\n\nDocuments:\n{}",
                    entry.subquery,
                    passages.join("\n\n---\n\n")
                )
            })
            .collect();

        sections.join("\n\n***\n\n")
    }

    /// Bundle entry count matches the sub-query count, with every index
    /// present exactly once
    pub fn bundle_is_consistent(&self) -> bool {
        self.retrieval_bundle.len() == self.subqueries.len()
            && (0..self.subqueries.len()).all(|i| self.retrieval_bundle.contains_key(&i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_bundle(lists: Vec<Vec<Passage>>) -> PipelineState {
        let mut state = PipelineState::new("assessment", 3);
        for (i, passages) in lists.into_iter().enumerate() {
            state.subqueries.push(format!("subquery {}", i));
            state.retrieval_bundle.insert(
                i,
                SubqueryEvidence::new(format!("subquery {}", i), passages),
            );
        }
        state
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = PipelineState::new("assessment", 3);
        assert_eq!(state.main_query, "assessment");
        assert!(state.subqueries.is_empty());
        assert!(state.retrieval_bundle.is_empty());
        assert!(!state.needs_fallback);
        assert!(state.answer.is_empty());
        assert!(!state.is_ungrounded);
        assert!(state.verification_report.is_none());
        assert_eq!(state.retry_budget, 3);
    }

    #[test]
    fn test_recompute_needs_fallback() {
        let mut state = state_with_bundle(vec![
            vec![Passage::new("a", "s")],
            vec![],
            vec![Passage::new("b", "s")],
        ]);

        state.recompute_needs_fallback();
        assert!(state.needs_fallback);
        assert_eq!(state.deficient_subqueries(), vec![1]);

        state.replace_passages(1, vec![Passage::new("web", "https://example.org")]);
        state.recompute_needs_fallback();
        assert!(!state.needs_fallback);
        assert!(state.deficient_subqueries().is_empty());
    }

    #[test]
    fn test_replace_passages_overwrites() {
        let mut state = state_with_bundle(vec![vec![
            Passage::new("a", "s"),
            Passage::new("b", "s"),
        ]]);

        state.replace_passages(0, vec![Passage::new("only", "s")]);
        assert_eq!(state.retrieval_bundle[&0].passages.len(), 1);
        assert_eq!(state.retrieval_bundle[&0].passages[0].content, "only");
    }

    #[test]
    fn test_bundle_consistency() {
        let state = state_with_bundle(vec![vec![], vec![]]);
        assert!(state.bundle_is_consistent());

        let mut broken = state.clone();
        broken.retrieval_bundle.remove(&1);
        assert!(!broken.bundle_is_consistent());
    }

    #[test]
    fn test_serialized_context_groups_by_subquery() {
        let state = state_with_bundle(vec![
            vec![Passage::new("flexion findings", "norkin.pdf")],
            vec![Passage::new("slr findings", "magee.pdf")],
        ]);

        let context = state.serialized_context();
        let first = context.find("subquery 0").unwrap();
        let second = context.find("subquery 1").unwrap();
        assert!(first < second);
        assert!(context.contains("source: norkin.pdf"));
        assert!(context.contains("content: slr findings"));
        assert!(context.contains("***"));
    }
}
