//! Evidence passages and the similarity-search contract

pub mod passage;
pub mod store;

pub use passage::{Passage, ScoredPassage, SubqueryEvidence};
pub use store::DocumentStore;

#[cfg(test)]
pub use store::mock::MockDocumentStore;
