//! Retry policy for transient transport failures.
//!
//! Only send-level failures (DNS, refused connection, timeout) are
//! retried; a response with any status code is handed back for the
//! caller to inspect, since a non-zero Endevor return code is an
//! application answer, not a transport fault. The attempt budget comes
//! from [`crate::config::ClientConfig::max_retries`]; an exhausted
//! budget surfaces the last failure, which read paths absorb like any
//! other connection failure.

use std::future::Future;
use std::time::Duration;

/// Delay before the first retry; doubles on every further attempt.
const BASE_DELAY_MS: u64 = 200;

/// Backoff schedule applied to every outbound request of a client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Run `f` until it succeeds or the attempt budget is spent.
    ///
    /// `f` is invoked at most `max_retries + 1` times; the delay before
    /// attempt `n` is `200ms * 2^(n-1)`.
    pub(crate) async fn send<T, E, F, Fut>(&self, f: F) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries => {
                    let delay = Duration::from_millis(BASE_DELAY_MS << attempt);
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        "Endevor request failed, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn a_success_is_returned_without_retrying() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = RetryPolicy::new(3)
            .send(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok("response") }
            })
            .await;
        assert_eq!(result, Ok("response"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn a_transient_failure_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = RetryPolicy::new(3)
            .send(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err("connection reset")
                    } else {
                        Ok("response")
                    }
                }
            })
            .await;
        assert_eq!(result, Ok("response"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn an_exhausted_budget_surfaces_the_last_failure() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = RetryPolicy::new(3)
            .send(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("connection refused") }
            })
            .await;
        assert_eq!(result, Err("connection refused"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn a_zero_budget_sends_exactly_once() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, &str> = RetryPolicy::new(0)
            .send(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("connection refused") }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
