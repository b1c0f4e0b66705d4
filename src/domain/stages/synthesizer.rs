//! Diagnosis synthesis contract and the structured answer types

use std::fmt::Debug;
use std::fmt::Write as _;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::retrieval::SubqueryEvidence;
use crate::domain::DomainError;

/// An inline citation attached to a diagnosis rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Inline marker as it appears in the rationale, e.g. "[1]"
    pub marker: String,
    pub source: String,
    pub quoted_text: String,
}

/// One candidate diagnosis with its supporting rationale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    pub diagnosis: String,
    pub rationale: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Structured differential-diagnosis answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisAnswer {
    pub summary: String,
    pub diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl DiagnosisAnswer {
    /// Serialize into the human-readable report: summary first, then each
    /// diagnosis with rationale and citations, then the references section.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Differential Diagnosis Report\n");
        out.push_str("=============================\n\n");

        out.push_str("Summary\n-------\n");
        out.push_str(self.summary.trim());
        out.push_str("\n\n");

        out.push_str("Diagnoses\n---------\n");
        for (i, dx) in self.diagnoses.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, dx.diagnosis);
            let _ = writeln!(out, "   Rationale: {}", dx.rationale.trim());
            for citation in &dx.citations {
                let _ = writeln!(
                    out,
                    "   {} {} - \"{}\"",
                    citation.marker, citation.source, citation.quoted_text
                );
            }
            out.push('\n');
        }

        out.push_str("References\n----------\n");
        for (i, reference) in self.references.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, reference);
        }

        out
    }
}

/// Produces a structured differential diagnosis from the main query and the
/// per-sub-query evidence bundle.
#[async_trait]
pub trait DiagnosisSynthesizer: Send + Sync + Debug {
    async fn synthesize(
        &self,
        main_query: &str,
        context: &[SubqueryEvidence],
    ) -> Result<DiagnosisAnswer, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock synthesizer returning a fixed answer; records the evidence
    /// bundles it is handed so tests can assert on generation input
    #[derive(Debug)]
    pub struct MockDiagnosisSynthesizer {
        answer: DiagnosisAnswer,
        error: Option<String>,
        calls: AtomicUsize,
        seen_contexts: Mutex<Vec<Vec<SubqueryEvidence>>>,
    }

    impl MockDiagnosisSynthesizer {
        pub fn with_answer(answer: DiagnosisAnswer) -> Self {
            Self {
                answer,
                error: None,
                calls: AtomicUsize::new(0),
                seen_contexts: Mutex::new(Vec::new()),
            }
        }

        pub fn canned() -> Self {
            Self::with_answer(DiagnosisAnswer {
                summary: "Mechanical low back pain presentation".to_string(),
                diagnoses: vec![Diagnosis {
                    diagnosis: "Lumbar disc herniation".to_string(),
                    rationale: "Radicular pain with positive straight leg raise [1]".to_string(),
                    citations: vec![Citation {
                        marker: "[1]".to_string(),
                        source: "orthopedic-assessment.pdf".to_string(),
                        quoted_text: "positive SLR reproduces radicular symptoms".to_string(),
                    }],
                }],
                references: vec!["orthopedic-assessment.pdf".to_string()],
            })
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen_contexts(&self) -> Vec<Vec<SubqueryEvidence>> {
            self.seen_contexts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DiagnosisSynthesizer for MockDiagnosisSynthesizer {
        async fn synthesize(
            &self,
            _main_query: &str,
            context: &[SubqueryEvidence],
        ) -> Result<DiagnosisAnswer, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_contexts.lock().unwrap().push(context.to_vec());

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock_synthesizer", error));
            }

            Ok(self.answer.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_section_order() {
        let answer = DiagnosisAnswer {
            summary: "Likely mechanical origin".to_string(),
            diagnoses: vec![
                Diagnosis {
                    diagnosis: "Lumbar disc herniation".to_string(),
                    rationale: "Radiating leg pain [1]".to_string(),
                    citations: vec![Citation {
                        marker: "[1]".to_string(),
                        source: "maitland.pdf".to_string(),
                        quoted_text: "radicular distribution".to_string(),
                    }],
                },
                Diagnosis {
                    diagnosis: "Facet joint dysfunction".to_string(),
                    rationale: "Pain on extension".to_string(),
                    citations: Vec::new(),
                },
            ],
            references: vec!["maitland.pdf".to_string()],
        };

        let report = answer.render();

        let summary_pos = report.find("Summary").unwrap();
        let diagnoses_pos = report.find("Diagnoses").unwrap();
        let references_pos = report.find("References").unwrap();
        assert!(summary_pos < diagnoses_pos);
        assert!(diagnoses_pos < references_pos);

        assert!(report.contains("1. Lumbar disc herniation"));
        assert!(report.contains("2. Facet joint dysfunction"));
        assert!(report.contains("[1] maitland.pdf - \"radicular distribution\""));
        assert!(report.contains("1. maitland.pdf"));
    }

    #[test]
    fn test_render_numbering_follows_input_order() {
        let answer = DiagnosisAnswer {
            summary: "s".to_string(),
            diagnoses: vec![
                Diagnosis {
                    diagnosis: "B".to_string(),
                    rationale: "r".to_string(),
                    citations: Vec::new(),
                },
                Diagnosis {
                    diagnosis: "A".to_string(),
                    rationale: "r".to_string(),
                    citations: Vec::new(),
                },
            ],
            references: Vec::new(),
        };

        let report = answer.render();
        assert!(report.find("1. B").unwrap() < report.find("2. A").unwrap());
    }
}
