//! Retry policy with exponential backoff
//!
//! The executor wraps any zero-argument async operation. By default every
//! failure is retried until the attempt budget runs out; `execute_if` lets the
//! caller stop early on errors that retrying cannot fix.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,

    /// Delay before the second attempt; doubles for every attempt after that
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom attempt budget and the default base delay
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Create a policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay_ms = u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Attempts actually made; a budget of zero still runs the operation once
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay after the failed attempt with the given zero-based index:
    /// `base_delay * 2^attempt`
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Outcome of a retried operation
#[derive(Debug)]
pub struct RetryResult<T, E> {
    /// Value of the successful attempt, or the error of the last one
    pub result: Result<T, E>,

    /// Number of attempts made
    pub attempts: u32,

    /// Delays slept between attempts, in order
    pub delays: Vec<Duration>,
}

impl<T, E> RetryResult<T, E> {
    pub fn total_delay(&self) -> Duration {
        self.delays.iter().sum()
    }
}

/// Executor for retry operations
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create a new retry executor with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the operation, retrying every failure up to the budget
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run(operation, |_| true).await.result
    }

    /// Run the operation, retrying only failures accepted by `should_retry`
    pub async fn execute_if<F, Fut, T, E, P>(&self, operation: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        self.run(operation, should_retry).await.result
    }

    /// Like [`execute`](Self::execute), also reporting attempts and delays
    pub async fn execute_with_report<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run(operation, |_| true).await
    }

    async fn run<F, Fut, T, E, P>(&self, mut operation: F, should_retry: P) -> RetryResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.policy.attempts();
        let mut delays = Vec::new();
        let mut attempt = 0;

        loop {
            let error = match operation().await {
                Ok(value) => {
                    return RetryResult {
                        result: Ok(value),
                        attempts: attempt + 1,
                        delays,
                    }
                }
                Err(error) => error,
            };

            let last_attempt = attempt + 1 >= max_attempts;
            if last_attempt || !should_retry(&error) {
                if last_attempt {
                    error!("All {} attempts failed: {}", max_attempts, error);
                } else {
                    warn!("Attempt {} failed with a non-retryable error: {}", attempt + 1, error);
                }
                return RetryResult {
                    result: Err(error),
                    attempts: attempt + 1,
                    delays,
                };
            }

            let delay = self.policy.calculate_delay(attempt);
            warn!(
                "Attempt {} failed: {}. Retrying in {:?}...",
                attempt + 1,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            delays.push(delay);
            attempt += 1;
        }
    }
}
