//! Exponential backoff for transient Management API failures.

use crate::error::{ManagementError, ManagementResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 250,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms: 10_000,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &ManagementError) -> bool {
        if attempt >= self.max_retries {
            return false;
        }
        error.is_retryable() || error.is_server_error()
    }

    /// `Retry-After` wins for rate limiting; otherwise
    /// `min(base * 2^attempt, max)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, error: &ManagementError) -> Duration {
        let ms = if let ManagementError::RateLimited {
            retry_after_secs: Some(retry_after),
        } = error
        {
            retry_after.saturating_mul(1000).min(self.max_delay_ms)
        } else {
            self.base_delay_ms
                .saturating_mul(2u64.saturating_pow(attempt))
                .min(self.max_delay_ms)
        };
        Duration::from_millis(ms)
    }

    /// Run `f` until it succeeds, fails permanently, or retries run out.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> ManagementResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = ManagementResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        let transient = error.is_retryable() || error.is_server_error();
                        if transient && attempt > 0 {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %error,
                                "Max retries exceeded"
                            );
                            return Err(ManagementError::MaxRetriesExceeded {
                                attempts: attempt + 1,
                                message: format!(
                                    "{operation_name} failed after {} attempt(s): {error}",
                                    attempt + 1
                                ),
                            });
                        }
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt, &error);
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_should_retry_rate_limited_until_max() {
        let policy = RetryPolicy::new(3, 1);
        let error = ManagementError::RateLimited {
            retry_after_secs: None,
        };
        assert!(policy.should_retry(0, &error));
        assert!(policy.should_retry(2, &error));
        assert!(!policy.should_retry(3, &error));
    }

    #[test]
    fn test_should_not_retry_client_errors() {
        let policy = RetryPolicy::new(3, 1);
        assert!(!policy.should_retry(0, &ManagementError::NotFound("role".into())));
        assert!(!policy.should_retry(
            0,
            &ManagementError::Api {
                status: 400,
                detail: "bad request".into()
            }
        ));
        assert!(policy.should_retry(
            0,
            &ManagementError::Api {
                status: 503,
                detail: "unavailable".into()
            }
        ));
    }

    #[test]
    fn test_delay_exponential_and_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
        };
        let error = ManagementError::Unreachable("host".into());
        assert_eq!(policy.delay_for(0, &error), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2, &error), Duration::from_millis(400));
        assert_eq!(policy.delay_for(6, &error), Duration::from_millis(1_000));
    }

    #[test]
    fn test_delay_honors_retry_after() {
        let policy = RetryPolicy::new(5, 100);
        let error = ManagementError::RateLimited {
            retry_after_secs: Some(2),
        };
        assert_eq!(policy.delay_for(3, &error), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_execute_succeeds_after_retries() {
        let policy = RetryPolicy::new(3, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(ManagementError::Unreachable("host".into()))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_not_found_is_not_retried() {
        let policy = RetryPolicy::new(3, 0);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: ManagementResult<()> = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ManagementError::NotFound("role".into()))
                }
            })
            .await;

        assert!(matches!(result, Err(ManagementError::NotFound(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_max_retries_exceeded() {
        let policy = RetryPolicy::new(2, 0);
        let result: ManagementResult<()> = policy
            .execute("test_op", || async {
                Err(ManagementError::Unreachable("host".into()))
            })
            .await;

        match result {
            Err(ManagementError::MaxRetriesExceeded { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected MaxRetriesExceeded, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_retry_policy_returns_original_error() {
        let policy = RetryPolicy::none();
        let result: ManagementResult<()> = policy
            .execute("test_op", || async {
                Err(ManagementError::Unreachable("host".into()))
            })
            .await;
        assert!(matches!(result, Err(ManagementError::Unreachable(_))));
    }
}
