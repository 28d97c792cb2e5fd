//! Retry with exponential backoff and jitter for transient backend errors.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

/// Backoff schedule. Delay before retry `n` (1-based) is
/// `base_delay_ms * 2^(n-1)` plus up to `max_jitter_ms` of random jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_jitter_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after a failed attempt (1-based). The exponent is
    /// clamped so the shift cannot overflow.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let base = self.base_delay_ms.saturating_mul(1u64 << exp);
        let jitter = if self.max_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        };
        Duration::from_millis(base.saturating_add(jitter))
    }
}

/// Run `op` until it succeeds, a non-transient error occurs, or the policy
/// is exhausted. Returns the last error in the failing cases.
pub async fn retry_with_backoff<T, E, Fut, Op, P>(
    policy: &RetryPolicy,
    is_transient: P,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts.max(1) && is_transient(&err) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "transient backend failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum TestErr {
        #[error("transient")]
        Transient,
        #[error("fatal")]
        Fatal,
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_jitter_ms: 0,
        }
    }

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 500,
            max_jitter_ms: 0,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let policy = RetryPolicy::default();
        for _ in 0..50 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_millis(500));
            assert!(delay <= Duration::from_millis(750));
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_runs_once() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, TestErr> =
            retry_with_backoff(&fast_policy(), |_| true, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, TestErr> = retry_with_backoff(
            &fast_policy(),
            |e| matches!(e, TestErr::Transient),
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestErr::Transient)
                } else {
                    Ok(9)
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_transient_error_fails_fast() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, TestErr> = retry_with_backoff(
            &fast_policy(),
            |e| matches!(e, TestErr::Transient),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestErr::Fatal)
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_policy_exhaustion_returns_last_error() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, TestErr> =
            retry_with_backoff(&fast_policy(), |_| true, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestErr::Transient)
            })
            .await;
        assert!(matches!(result, Err(TestErr::Transient)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
