//! Bounded, constant-delay retry.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts: attempts.max(1), delay }
    }
}

#[derive(Debug)]
pub enum Retry<T, E> {
    Done(T),
    Exhausted { attempts: u32, last_error: Option<E> },
}

impl<T, E> Retry<T, E> {
    pub fn ok(self) -> Option<T> {
        match self {
            Retry::Done(value) => Some(value),
            Retry::Exhausted { .. } => None,
        }
    }
}

/// Runs `op` until it succeeds or `policy.attempts` is reached, sleeping
/// `policy.delay` between attempts. Each failure is logged, never propagated.
pub async fn retry_fixed<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Retry<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut last_error = None;
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Retry::Done(value),
            Err(err) => {
                warn!(%err, attempt, attempts, "{label} failed");
                last_error = Some(err);
            }
        }
        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    Retry::Exhausted { attempts, last_error }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn stops_at_first_success() {
        let calls = AtomicU32::new(0);
        let out = retry_fixed(RetryPolicy::new(5, Duration::ZERO), "probe", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 { Err(format!("down {n}")) } else { Ok(n) }
        })
        .await;
        assert_eq!(out.ok(), Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_after_bounded_attempts() {
        let calls = AtomicU32::new(0);
        let out: Retry<(), String> =
            retry_fixed(RetryPolicy::new(4, Duration::from_millis(1)), "probe", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("refused".to_string())
            })
            .await;
        match out {
            Retry::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error.as_deref(), Some("refused"));
            }
            Retry::Done(_) => panic!("expected exhaustion"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts, 1);
    }
}
