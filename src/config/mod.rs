//! Application configuration

pub mod app_config;

pub use app_config::{
    AppConfig, DocumentStoreConfig, LlmConfig, LogFormat, LoggingConfig, PipelineSettings,
    WebSearchConfig,
};
