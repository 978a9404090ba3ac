//! Retry with exponential backoff for rate-limited completions.
//!
//! Only `RateLimited` failures are retried; the typed error classification
//! from the transport layer decides, never the error message text. Delays
//! use `tokio::time::sleep`, so a backing-off request suspends its own task
//! without blocking other in-flight requests.

use cocorabot_core::error::ProviderError;
use cocorabot_core::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use std::time::Duration;
use tracing::warn;

/// Backoff policy for rate-limited completion calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, first try included. Must be at least 1.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Call `provider.complete`, retrying on rate limits per `policy`.
///
/// Non-retryable errors propagate immediately. When every attempt is rate
/// limited, the final `RateLimited` error is returned.
pub async fn complete_with_backoff(
    provider: &dyn CompletionProvider,
    request: CompletionRequest,
    policy: &RetryPolicy,
) -> std::result::Result<CompletionResponse, ProviderError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.base_delay;

    for attempt in 1..=max_attempts {
        match provider.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(
                    provider = provider.name(),
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited; backing off before retry"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("loop returns on the final attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cocorabot_core::message::Turn;
    use cocorabot_core::provider::GenerationSettings;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Fails with a rate limit for the first `fail_count` calls, then
    /// succeeds.
    struct FlakyProvider {
        fail_count: usize,
        calls: Mutex<usize>,
    }

    impl FlakyProvider {
        fn new(fail_count: usize) -> Self {
            Self {
                fail_count,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.fail_count {
                Err(ProviderError::RateLimited { retry_after_secs: 1 })
            } else {
                Ok(CompletionResponse {
                    text: "respuesta".into(),
                    model: request.model,
                })
            }
        }
    }

    /// Always fails with the given error.
    struct FailingProvider {
        error: ProviderError,
        calls: Mutex<usize>,
    }

    impl FailingProvider {
        fn new(error: ProviderError) -> Self {
            Self {
                error,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            Err(self.error.clone())
        }
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "test".into(),
            turns: vec![Turn::user("hola")],
            generation: GenerationSettings::default(),
        }
    }

    fn test_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_twice_then_success() {
        let provider = FlakyProvider::new(2);
        let start = Instant::now();

        let result = complete_with_backoff(&provider, test_request(), &test_policy()).await;

        assert_eq!(result.unwrap().text, "respuesta");
        assert_eq!(provider.calls(), 3);
        // Two backoffs: 500ms then 1000ms.
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_rate_limited() {
        let provider = FailingProvider::new(ProviderError::RateLimited { retry_after_secs: 1 });

        let result = complete_with_backoff(&provider, test_request(), &test_policy()).await;

        match result {
            Err(ProviderError::RateLimited { .. }) => {}
            other => panic!("Expected RateLimited, got: {other:?}"),
        }
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_propagates_immediately() {
        let provider = FailingProvider::new(ProviderError::AuthenticationFailed("bad key".into()));
        let start = Instant::now();

        let result = complete_with_backoff(&provider, test_request(), &test_policy()).await;

        match result {
            Err(ProviderError::AuthenticationFailed(_)) => {}
            other => panic!("Expected AuthenticationFailed, got: {other:?}"),
        }
        assert_eq!(provider.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_sleeps() {
        let provider = FailingProvider::new(ProviderError::RateLimited { retry_after_secs: 1 });
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_secs(10),
        };
        let start = Instant::now();

        let result = complete_with_backoff(&provider, test_request(), &policy).await;

        assert!(result.is_err());
        assert_eq!(provider.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_skips_backoff() {
        let provider = FlakyProvider::new(0);
        let start = Instant::now();

        let result = complete_with_backoff(&provider, test_request(), &test_policy()).await;

        assert!(result.is_ok());
        assert_eq!(provider.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
