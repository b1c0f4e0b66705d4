//! Workflow orchestration

pub mod orchestrator;

pub use orchestrator::{DiagnosisPipeline, PipelineConfig};
