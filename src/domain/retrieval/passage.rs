use serde::{Deserialize, Serialize};

/// A unit of retrieved evidence text plus its source locator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub source: String,
}

impl Passage {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// A passage returned by similarity search, with its distance score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Similarity score (higher is more similar)
    pub score: f32,
}

impl ScoredPassage {
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            passage: Passage::new(content, source),
            score,
        }
    }

    pub fn into_passage(self) -> Passage {
        self.passage
    }
}

/// One sub-query together with the evidence passages currently backing it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubqueryEvidence {
    pub subquery: String,
    pub passages: Vec<Passage>,
}

impl SubqueryEvidence {
    pub fn new(subquery: impl Into<String>, passages: Vec<Passage>) -> Self {
        Self {
            subquery: subquery.into(),
            passages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}
