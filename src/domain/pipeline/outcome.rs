//! Terminal result of a diagnosis run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::stages::{DiagnosisAnswer, VerificationReport};

/// How the run reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Verification passed
    Grounded,
    /// Every permitted attempt failed verification; the last answer is
    /// returned anyway as a best effort
    RetryExhausted,
}

/// Completed run: the rendered report, the structured answer behind it, and
/// the last verification pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisOutcome {
    pub run_id: Uuid,
    pub report: String,
    pub answer: DiagnosisAnswer,
    pub verification: Option<VerificationReport>,
    pub termination: Termination,
    pub generation_attempts: u32,
    pub retry_budget_remaining: u32,
    pub completed_at: DateTime<Utc>,
}

impl DiagnosisOutcome {
    pub fn is_grounded(&self) -> bool {
        self.termination == Termination::Grounded
    }
}
