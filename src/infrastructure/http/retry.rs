//! Transport-level retry with exponential backoff
//!
//! Transient HTTP failures are retried here, at the call layer. This is
//! independent of the pipeline's own regeneration loop, which concerns
//! groundedness only.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::client::HttpClientTrait;
use crate::domain::DomainError;

/// Retry configuration for transport calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the initial call
    pub max_retries: u32,
    /// Initial delay before the first retry
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 200,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Calculate delay for a given attempt number (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms);
        }

        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

/// Decorator that retries failed posts with backoff
#[derive(Debug)]
pub struct RetryingHttpClient<C: HttpClientTrait> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: HttpClientTrait> RetryingHttpClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn with_defaults(inner: C) -> Self {
        Self::new(inner, RetryPolicy::default())
    }
}

#[async_trait]
impl<C: HttpClientTrait> HttpClientTrait for RetryingHttpClient<C> {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let max_attempts = self.policy.max_retries + 1;
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for_attempt(attempt - 1);
                tokio::time::sleep(delay).await;
            }

            match self.inner.post_json(url, headers.clone(), body).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        "HTTP call to {} failed (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        max_attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DomainError::internal("retry loop ended without an attempt")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FlakyClient {
        failures_before_success: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpClientTrait for FlakyClient {
        async fn post_json(
            &self,
            _url: &str,
            _headers: Vec<(&str, &str)>,
            _body: &serde_json::Value,
        ) -> Result<serde_json::Value, DomainError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(DomainError::provider("http", "connection reset"))
            } else {
                Ok(serde_json::json!({"ok": true}))
            }
        }
    }

    #[test]
    fn test_backoff_delays_grow_and_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 300,
            backoff_multiplier: 2.0,
        };

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let inner = FlakyClient {
            failures_before_success: 2,
            calls: AtomicUsize::new(0),
        };
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
        };
        let client = RetryingHttpClient::new(inner, policy);

        let result = client
            .post_json("http://test", Vec::new(), &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(result["ok"], true);
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let inner = FlakyClient {
            failures_before_success: 10,
            calls: AtomicUsize::new(0),
        };
        let policy = RetryPolicy {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
        };
        let client = RetryingHttpClient::new(inner, policy);

        let result = client
            .post_json("http://test", Vec::new(), &serde_json::json!({}))
            .await;

        assert!(result.is_err());
        assert_eq!(client.inner.calls.load(Ordering::SeqCst), 3);
    }
}
