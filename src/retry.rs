//! Bounded exponential-backoff retry for remote translation calls.
//!
//! Translation APIs fail transiently and frequently under concurrent load
//! (429 rate limits, 5xx backend hiccups). The combinator here retries only
//! failures whose status is in the transient set (see
//! [`RemoteError::is_transient`]); everything else surfaces immediately.
//! Backoff is `base_delay * 2^attempt` plus a small uniform jitter so that
//! concurrently scheduled pages do not wake up and hammer a recovering
//! endpoint in lock-step.

use crate::error::RemoteError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// How a remote call is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first; 0 means fail on the first error.
    pub retries: u32,
    /// Backoff for the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 4,
            base_delay: Duration::from_millis(800),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying after the failure of attempt `attempt`
    /// (0-based): `base_delay * 2^attempt` plus jitter uniform in
    /// `[0, base_delay / 4)`.
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = self.base_delay.mul_f64(rand::rng().random_range(0.0..0.25));
        exp + jitter
    }
}

/// Invoke `op`, retrying transient failures per `policy`.
///
/// Returns the first success, the first permanent failure unchanged, or —
/// once the retry budget is exhausted — the last transient failure.
pub async fn with_retry<T, F, Fut>(mut op: F, policy: &RetryPolicy) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    for attempt in 0..=policy.retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.retries => {
                let wait = policy.backoff(attempt);
                warn!(
                    "transient failure ({e}), retry {}/{} in {:?}",
                    attempt + 1,
                    policy.retries,
                    wait
                );
                sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
    unreachable!("loop returns on the final attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            base_delay: Duration::from_millis(100),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn two_transient_failures_then_success() {
        let calls = Cell::new(0u32);
        let result = with_retry(
            || {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n <= 2 {
                        Err(RemoteError::http(429, "rate limited"))
                    } else {
                        Ok("done")
                    }
                }
            },
            &policy(4),
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3, "operation must be invoked exactly 3 times");
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failure_is_not_retried() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(
            || {
                calls.set(calls.get() + 1);
                async { Err(RemoteError::http(400, "malformed request")) }
            },
            &policy(4),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(calls.get(), 1, "operation must be invoked exactly once");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "malformed request");
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_returns_last_transient_failure() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(
            || {
                let n = calls.get() + 1;
                calls.set(n);
                async move { Err(RemoteError::http(503, format!("down ({n})"))) }
            },
            &policy(2),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(calls.get(), 3, "1 initial + 2 retries");
        assert_eq!(err.status, Some(503));
        assert_eq!(err.message, "down (3)", "must be the last failure");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_fails_on_first_transient_error() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = with_retry(
            || {
                calls.set(calls.get() + 1);
                async { Err(RemoteError::http(503, "down")) }
            },
            &policy(0),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let p = policy(4);
        // Jitter is < base_delay / 4, so the exponential part dominates.
        assert!(p.backoff(0) >= Duration::from_millis(100));
        assert!(p.backoff(0) < Duration::from_millis(125));
        assert!(p.backoff(2) >= Duration::from_millis(400));
        assert!(p.backoff(2) < Duration::from_millis(425));
    }
}
