//! HTTP transport shared by the LLM, document-store, and web-search clients

pub mod client;
pub mod retry;

pub use client::{HttpClient, HttpClientTrait};
pub use retry::{RetryPolicy, RetryingHttpClient};

#[cfg(test)]
pub use client::mock::MockHttpClient;
