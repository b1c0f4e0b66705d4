//! Faithfulness verification contract and report types

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Verifier's confidence in its own judgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

/// Verdict on a single claim extracted from the answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimVerdict {
    pub claim: String,
    pub is_grounded: bool,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub explanation: String,
}

/// A statement flagged as unsupported by the context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hallucination {
    pub statement: String,
    #[serde(default)]
    pub explanation: String,
}

/// Groundedness assessment of one synthesized answer against the evidence
/// bundle that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Continuous groundedness score in [0, 1]
    pub grounded_score: f64,
    pub confidence: Confidence,
    pub summary: String,
    #[serde(default)]
    pub claims: Vec<ClaimVerdict>,
    #[serde(default)]
    pub hallucinations: Vec<Hallucination>,
}

impl VerificationReport {
    /// Conservative report used when a verification call produced
    /// unusable output: scored fully ungrounded at low confidence.
    pub fn unverified(reason: impl Into<String>) -> Self {
        Self {
            grounded_score: 0.0,
            confidence: Confidence::Low,
            summary: reason.into(),
            claims: Vec::new(),
            hallucinations: Vec::new(),
        }
    }
}

/// Scores a synthesized answer's groundedness against the serialized
/// evidence context.
#[async_trait]
pub trait FaithfulnessVerifier: Send + Sync + Debug {
    async fn verify(&self, context: &str, answer: &str)
        -> Result<VerificationReport, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unverified_report_is_conservative() {
        let report = VerificationReport::unverified("grader output unusable");
        assert_eq!(report.grounded_score, 0.0);
        assert_eq!(report.confidence, Confidence::Low);
        assert!(report.claims.is_empty());
    }

    #[test]
    fn test_report_deserializes_with_defaults() {
        let json = r#"{
            "grounded_score": 0.85,
            "confidence": "High",
            "summary": "well grounded"
        }"#;

        let report: VerificationReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.grounded_score, 0.85);
        assert!(report.claims.is_empty());
        assert!(report.hallucinations.is_empty());
    }
}
