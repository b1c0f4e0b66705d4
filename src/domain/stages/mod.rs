//! Pipeline stage contracts
//!
//! Each stage is an independent text-transformation behind an async trait,
//! so the orchestrator can be exercised with test doubles and any stage can
//! be rebacked by a different provider without touching the control flow.

pub mod compressor;
pub mod decomposer;
pub mod grader;
pub mod synthesizer;
pub mod verifier;

pub use compressor::ContextCompressor;
pub use decomposer::QueryDecomposer;
pub use grader::{RelevanceGrader, RelevanceVerdict};
pub use synthesizer::{Citation, Diagnosis, DiagnosisAnswer, DiagnosisSynthesizer};
pub use verifier::{
    ClaimVerdict, Confidence, FaithfulnessVerifier, Hallucination, VerificationReport,
};

#[cfg(test)]
pub use compressor::mock::MockContextCompressor;
#[cfg(test)]
pub use decomposer::mock::MockQueryDecomposer;
#[cfg(test)]
pub use grader::mock::MockRelevanceGrader;
#[cfg(test)]
pub use synthesizer::mock::MockDiagnosisSynthesizer;
#[cfg(test)]
pub use verifier::mock::MockFaithfulnessVerifier;
