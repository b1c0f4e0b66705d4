//! Diagnosis workflow orchestrator
//!
//! Drives one run through the stage machine: decompose the assessment,
//! retrieve per sub-query, grade relevance concurrently, fall back to web
//! search for sub-queries left without evidence, compress the surviving
//! context, then loop generation and verification until the answer is
//! grounded or the retry budget runs out. An ungrounded answer is still
//! returned after the last attempt, flagged as such.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::pipeline::{
    DiagnosisOutcome, PipelineError, PipelineStage, PipelineState, Termination,
};
use crate::domain::retrieval::{Passage, ScoredPassage, SubqueryEvidence};
use crate::domain::stages::{DiagnosisAnswer, VerificationReport};
use crate::domain::{
    ContextCompressor, DiagnosisSynthesizer, DocumentStore, FaithfulnessVerifier, QueryDecomposer,
    RelevanceGrader, WebSearchTool,
};

/// Verification passes scoring above this are accepted as grounded
const GROUNDED_SCORE_THRESHOLD: f64 = 0.7;

/// Orchestrator tuning knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nearest neighbours fetched per sub-query
    pub top_k: usize,
    /// Regeneration attempts permitted after a failed verification
    pub retry_budget: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            retry_budget: 3,
        }
    }
}

/// End-to-end diagnosis pipeline over injected collaborators
#[derive(Debug)]
pub struct DiagnosisPipeline {
    decomposer: Arc<dyn QueryDecomposer>,
    store: Arc<dyn DocumentStore>,
    grader: Arc<dyn RelevanceGrader>,
    web_search: Arc<dyn WebSearchTool>,
    compressor: Arc<dyn ContextCompressor>,
    synthesizer: Arc<dyn DiagnosisSynthesizer>,
    verifier: Arc<dyn FaithfulnessVerifier>,
    config: PipelineConfig,
}

impl DiagnosisPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        decomposer: Arc<dyn QueryDecomposer>,
        store: Arc<dyn DocumentStore>,
        grader: Arc<dyn RelevanceGrader>,
        web_search: Arc<dyn WebSearchTool>,
        compressor: Arc<dyn ContextCompressor>,
        synthesizer: Arc<dyn DiagnosisSynthesizer>,
        verifier: Arc<dyn FaithfulnessVerifier>,
    ) -> Self {
        Self {
            decomposer,
            store,
            grader,
            web_search,
            compressor,
            synthesizer,
            verifier,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a diagnosis with the configured retry budget
    pub async fn run(&self, main_query: &str) -> Result<DiagnosisOutcome, PipelineError> {
        self.run_with_budget(main_query, self.config.retry_budget).await
    }

    /// Run a diagnosis with an explicit retry budget
    pub async fn run_with_budget(
        &self,
        main_query: &str,
        retry_budget: u32,
    ) -> Result<DiagnosisOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("diagnosis_run", %run_id);
        self.execute_run(run_id, main_query, retry_budget)
            .instrument(span)
            .await
    }

    async fn execute_run(
        &self,
        run_id: Uuid,
        main_query: &str,
        retry_budget: u32,
    ) -> Result<DiagnosisOutcome, PipelineError> {
        let mut state = PipelineState::new(main_query, retry_budget);
        let mut stage = PipelineStage::Decompose;
        let mut last_answer: Option<DiagnosisAnswer> = None;
        let mut generation_attempts = 0u32;

        while !stage.is_terminal() {
            debug!(stage = %stage, "entering stage");

            state = match stage {
                PipelineStage::Decompose => self.decompose(state).await?,
                PipelineStage::Retrieve => self.retrieve(state).await?,
                PipelineStage::Filter => self.filter(state).await?,
                PipelineStage::FallbackSearch => self.fallback_search(state).await?,
                PipelineStage::Compress => self.compress(state).await?,
                PipelineStage::Generate => {
                    generation_attempts += 1;
                    let (next, answer) = self.generate(state).await?;
                    last_answer = Some(answer);
                    next
                }
                PipelineStage::Verify => self.verify(state).await,
                PipelineStage::End => break,
            };

            let next = stage.next(&state);

            // Each verification pass charges the budget once; the retry
            // decision above is taken against the pre-charge budget, so a
            // run with budget N generates at most N + 1 times.
            if matches!(stage, PipelineStage::Verify) {
                state.retry_budget = state.retry_budget.saturating_sub(1);
            }

            stage = next;
        }

        let Some(answer) = last_answer else {
            return Err(PipelineError::Generation {
                source: crate::domain::DomainError::internal(
                    "run reached its terminal state without a generated answer",
                ),
            });
        };

        let termination = if state.is_ungrounded {
            warn!("retry budget exhausted; returning best-effort answer");
            Termination::RetryExhausted
        } else {
            Termination::Grounded
        };

        info!(
            termination = termination_kind(&termination),
            generation_attempts, "diagnosis run complete"
        );

        Ok(DiagnosisOutcome {
            run_id,
            report: state.answer.clone(),
            answer,
            verification: state.verification_report,
            termination,
            generation_attempts,
            retry_budget_remaining: state.retry_budget,
            completed_at: Utc::now(),
        })
    }

    /// DECOMPOSE: split the assessment into focused sub-queries
    async fn decompose(&self, mut state: PipelineState) -> Result<PipelineState, PipelineError> {
        let main_query = state.main_query.trim().to_string();
        if main_query.is_empty() {
            return Err(PipelineError::Decomposition {
                reason: "assessment input is empty".to_string(),
            });
        }

        let subqueries = self
            .decomposer
            .decompose(&main_query)
            .await
            .map_err(|e| PipelineError::Decomposition {
                reason: e.to_string(),
            })?;

        if subqueries.is_empty() {
            return Err(PipelineError::Decomposition {
                reason: "decomposer produced no sub-queries".to_string(),
            });
        }

        info!("decomposed assessment into {} sub-queries", subqueries.len());
        state.subqueries = subqueries;

        Ok(state)
    }

    /// RETRIEVE: one similarity search per sub-query; failures are fatal
    async fn retrieve(&self, mut state: PipelineState) -> Result<PipelineState, PipelineError> {
        let mut bundle = BTreeMap::new();

        for (index, subquery) in state.subqueries.iter().enumerate() {
            let results = self
                .store
                .similarity_search(subquery, self.config.top_k)
                .await
                .map_err(|source| PipelineError::Retrieval { index, source })?;

            let passages: Vec<Passage> =
                results.into_iter().map(ScoredPassage::into_passage).collect();

            debug!("retrieved {} passages for sub-query {}", passages.len(), index);
            bundle.insert(index, SubqueryEvidence::new(subquery.clone(), passages));
        }

        state.retrieval_bundle = bundle;
        debug_assert!(state.bundle_is_consistent());

        Ok(state)
    }

    /// FILTER: grade every (sub-query, passage) pair concurrently, keep only
    /// relevant passages, then recompute the fallback flag.
    ///
    /// A failed grading call marks its pair not relevant instead of failing
    /// the batch.
    async fn filter(&self, mut state: PipelineState) -> Result<PipelineState, PipelineError> {
        let mut tasks = Vec::new();

        for (&index, entry) in &state.retrieval_bundle {
            for (position, passage) in entry.passages.iter().enumerate() {
                let grader = Arc::clone(&self.grader);
                let subquery = entry.subquery.clone();
                let content = passage.content.clone();

                tasks.push(async move {
                    let relevant = match grader.grade(&subquery, &content).await {
                        Ok(verdict) => verdict.is_relevant,
                        Err(e) => {
                            warn!(
                                "grading failed for sub-query {} passage {}: {}; \
                                 treating as not relevant",
                                index, position, e
                            );
                            false
                        }
                    };
                    (index, position, relevant)
                });
            }
        }

        let graded_total = tasks.len();
        let verdicts = join_all(tasks).await;

        let mut keep: BTreeMap<usize, Vec<bool>> = state
            .retrieval_bundle
            .iter()
            .map(|(&index, entry)| (index, vec![false; entry.passages.len()]))
            .collect();

        for (index, position, relevant) in verdicts {
            if let Some(flags) = keep.get_mut(&index) {
                flags[position] = relevant;
            }
        }

        for (index, flags) in keep {
            if let Some(entry) = state.retrieval_bundle.get_mut(&index) {
                let filtered: Vec<Passage> = entry
                    .passages
                    .iter()
                    .zip(&flags)
                    .filter(|(_, kept)| **kept)
                    .map(|(passage, _)| passage.clone())
                    .collect();
                entry.passages = filtered;
            }
        }

        state.recompute_needs_fallback();
        debug_assert!(state.bundle_is_consistent());

        info!(
            "graded {} passages; {} sub-queries need fallback search",
            graded_total,
            state.deficient_subqueries().len()
        );

        Ok(state)
    }

    /// FALLBACK_SEARCH: web search only for sub-queries left without
    /// evidence; all searches run concurrently and join before the results
    /// are applied. Any sub-query still empty afterwards aborts the run.
    async fn fallback_search(
        &self,
        mut state: PipelineState,
    ) -> Result<PipelineState, PipelineError> {
        let deficient = state.deficient_subqueries();

        let tasks: Vec<_> = deficient
            .into_iter()
            .filter_map(|index| {
                state.retrieval_bundle.get(&index).map(|entry| {
                    let tool = Arc::clone(&self.web_search);
                    let subquery = entry.subquery.clone();
                    async move {
                        let result = tool.search(&subquery).await;
                        (index, result)
                    }
                })
            })
            .collect();

        info!("running fallback web search for {} sub-queries", tasks.len());
        let results = join_all(tasks).await;

        for (index, result) in results {
            match result {
                Ok(hits) => {
                    let passages: Vec<Passage> = hits
                        .into_iter()
                        .map(|hit| Passage::new(hit.content, hit.url))
                        .collect();
                    state.replace_passages(index, passages);
                }
                Err(e) => {
                    warn!("web search failed for sub-query {}: {}", index, e);
                }
            }
        }

        if let Some(entry) = state.retrieval_bundle.values().find(|e| e.is_empty()) {
            return Err(PipelineError::InsufficientEvidence {
                subquery: entry.subquery.clone(),
            });
        }

        state.recompute_needs_fallback();
        debug_assert!(state.bundle_is_consistent());

        Ok(state)
    }

    /// COMPRESS: rewrite each sub-query's passages concurrently; every list
    /// is replaced wholesale. An empty compression result keeps the original
    /// passages so generation never sees an empty context.
    async fn compress(&self, mut state: PipelineState) -> Result<PipelineState, PipelineError> {
        let tasks: Vec<_> = state
            .retrieval_bundle
            .iter()
            .map(|(&index, entry)| {
                let compressor = Arc::clone(&self.compressor);
                let subquery = entry.subquery.clone();
                let passages = entry.passages.clone();
                async move {
                    let result = compressor.compress(&subquery, &passages).await;
                    (index, result)
                }
            })
            .collect();

        let results = join_all(tasks).await;

        for (index, result) in results {
            match result {
                Ok(compressed) if compressed.is_empty() => {
                    warn!(
                        "compression emptied sub-query {}; keeping original passages",
                        index
                    );
                }
                Ok(compressed) => state.replace_passages(index, compressed),
                Err(source) => return Err(PipelineError::Compression { index, source }),
            }
        }

        debug_assert!(state.bundle_is_consistent());

        Ok(state)
    }

    /// GENERATE: one synthesis call over the whole evidence bundle
    async fn generate(
        &self,
        mut state: PipelineState,
    ) -> Result<(PipelineState, DiagnosisAnswer), PipelineError> {
        let context = state.ordered_evidence();
        debug_assert!(context.iter().all(|entry| !entry.is_empty()));

        let answer = self
            .synthesizer
            .synthesize(&state.main_query, &context)
            .await
            .map_err(|source| PipelineError::Generation { source })?;

        info!("generated diagnosis with {} candidates", answer.diagnoses.len());
        state.answer = answer.render();

        Ok((state, answer))
    }

    /// VERIFY: score the answer against the serialized context. An unusable
    /// verifier response counts as an ungrounded pass.
    async fn verify(&self, mut state: PipelineState) -> PipelineState {
        let context = state.serialized_context();

        let report = match self.verifier.verify(&context, &state.answer).await {
            Ok(report) => report,
            Err(e) => {
                warn!("verification failed: {}; treating the answer as ungrounded", e);
                VerificationReport::unverified(format!("verification unavailable: {}", e))
            }
        };

        let grounded = report.grounded_score > GROUNDED_SCORE_THRESHOLD;
        state.is_ungrounded = !grounded;
        state.verification_report = Some(report);

        info!(
            grounded,
            remaining_budget = state.retry_budget,
            "verification pass complete"
        );

        state
    }
}

fn termination_kind(termination: &Termination) -> &'static str {
    match termination {
        Termination::Grounded => "grounded",
        Termination::RetryExhausted => "retry_exhausted",
    }
}
