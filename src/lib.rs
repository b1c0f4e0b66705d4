//! physiodx
//!
//! Retrieval-augmented differential diagnosis for physiotherapy
//! assessments: decompose an assessment into sub-queries, retrieve and
//! grade evidence, fall back to web search where the corpus has nothing
//! relevant, compress the surviving context, then generate and verify a
//! diagnosis with a bounded regeneration loop.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::pipeline::{DiagnosisOutcome, PipelineError, Termination};
pub use infrastructure::pipeline::{DiagnosisPipeline, PipelineConfig};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use config::LlmConfig;
use infrastructure::{
    HttpClient, LlmContextCompressor, LlmDiagnosisSynthesizer, LlmFaithfulnessVerifier,
    LlmQueryDecomposer, LlmRelevanceGrader, OpenAiEmbedder, OpenAiProvider, QdrantDocumentStore,
    RetryingHttpClient, TavilySearch,
};

type Transport = RetryingHttpClient<HttpClient>;
type Provider = OpenAiProvider<Transport>;

/// Wire up a pipeline against the live collaborators.
///
/// API keys come from the environment: `OPENAI_API_KEY` is required,
/// `TAVILY_API_KEY` enables fallback web search.
pub fn create_pipeline(config: &AppConfig) -> anyhow::Result<DiagnosisPipeline> {
    let openai_api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable is required"))?;
    let tavily_api_key = std::env::var("TAVILY_API_KEY").unwrap_or_else(|_| {
        info!("TAVILY_API_KEY not set; fallback web search will be rejected by the API");
        "tvly-placeholder".to_string()
    });

    let timeout = Duration::from_secs(config.llm.timeout_secs);

    let llm_provider = Arc::new(create_llm_provider(&config.llm, &openai_api_key, timeout)?);

    let embedder = create_embedder(&config.llm, &openai_api_key, timeout)?;
    let store = Arc::new(QdrantDocumentStore::new(
        transport(timeout)?,
        Arc::new(embedder),
        config.document_store.url.clone(),
        config.document_store.collection.clone(),
    ));

    let web_search = Arc::new(TavilySearch::new(
        transport(timeout)?,
        tavily_api_key,
        config.web_search.max_results,
    ));

    let decomposer = Arc::new(LlmQueryDecomposer::new(
        llm_provider.clone(),
        config.llm.grading_model.clone(),
    ));
    let grader = Arc::new(LlmRelevanceGrader::new(
        llm_provider.clone(),
        config.llm.grading_model.clone(),
    ));
    let compressor = Arc::new(LlmContextCompressor::new(
        llm_provider.clone(),
        config.llm.generation_model.clone(),
    ));
    let synthesizer = Arc::new(LlmDiagnosisSynthesizer::new(
        llm_provider.clone(),
        config.llm.generation_model.clone(),
    ));
    let verifier = Arc::new(LlmFaithfulnessVerifier::new(
        llm_provider.clone(),
        config.llm.generation_model.clone(),
    ));

    let pipeline_config = PipelineConfig {
        top_k: config.document_store.top_k,
        retry_budget: config.pipeline.retry_budget,
    };

    Ok(DiagnosisPipeline::new(
        decomposer,
        store,
        grader,
        web_search,
        compressor,
        synthesizer,
        verifier,
    )
    .with_config(pipeline_config))
}

fn transport(timeout: Duration) -> anyhow::Result<Transport> {
    Ok(RetryingHttpClient::with_defaults(HttpClient::with_timeout(
        timeout,
    )?))
}

fn create_llm_provider(
    config: &LlmConfig,
    api_key: &str,
    timeout: Duration,
) -> anyhow::Result<Provider> {
    let client = transport(timeout)?;

    if let Some(base_url) = &config.base_url {
        info!("Using OpenAI provider with custom base URL: {}", base_url);
        Ok(OpenAiProvider::with_base_url(client, api_key, base_url))
    } else {
        Ok(OpenAiProvider::new(client, api_key))
    }
}

fn create_embedder(
    config: &LlmConfig,
    api_key: &str,
    timeout: Duration,
) -> anyhow::Result<OpenAiEmbedder<Transport>> {
    let client = transport(timeout)?;

    if let Some(base_url) = &config.base_url {
        Ok(OpenAiEmbedder::with_base_url(
            client,
            api_key,
            config.embedding_model.clone(),
            base_url,
        ))
    } else {
        Ok(OpenAiEmbedder::new(
            client,
            api_key,
            config.embedding_model.clone(),
        ))
    }
}
