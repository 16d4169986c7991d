//! Bounded retry with exponential backoff for transient provider failures.
use std::{future::Future, time::Duration};

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{CoreError, PlatformError, poll::sleep_or_cancel};

/// Randomization applied on top of the computed backoff delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JitterStrategy {
    /// Exact delay.
    None,
    /// Uniform in `[0, delay]`.
    #[default]
    Full,
    /// `delay / 2` plus uniform in `[0, delay / 2]`.
    Equal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total tries including the first one; `1` disables retries.
    pub max_attempts: u32,
    pub first_ms: u64,
    pub max_ms: u64,
    pub factor: f64,
    pub jitter: JitterStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            first_ms: 500,
            max_ms: 8_000,
            factor: 2.0,
            jitter: JitterStrategy::Full,
        }
    }
}

impl RetryPolicy {
    pub fn never() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let ms = self.first_ms as f64 * self.factor.powi(exp);
        let capped = ms.min(self.max_ms as f64);
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_millis(capped as u64)
        } else {
            Duration::from_millis(self.max_ms)
        }
    }

    pub fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        let ms = base.as_millis() as u64;
        match self.jitter {
            JitterStrategy::None => base,
            JitterStrategy::Full => Duration::from_millis(rand::thread_rng().gen_range(0..=ms)),
            JitterStrategy::Equal => {
                let half = ms / 2;
                Duration::from_millis(half + rand::thread_rng().gen_range(0..=ms - half))
            }
        }
    }

    /// Runs `call` until it succeeds, fails with a non-transient error, or
    /// the attempt budget is spent. Each call and each backoff sleep is raced
    /// against `cancel`.
    pub async fn run<T, F, Fut>(
        &self,
        op: &'static str,
        cancel: &CancellationToken,
        mut call: F,
    ) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlatformError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                r = call() => r,
            };

            let err = match result {
                Ok(v) => return Ok(v),
                Err(e) if !e.is_transient() => return Err(CoreError::Platform(e)),
                Err(e) => e,
            };
            if attempt >= max_attempts {
                if attempt == 1 {
                    return Err(CoreError::Platform(err));
                }
                return Err(CoreError::RetriesExhausted {
                    op,
                    attempts: attempt,
                    last: err,
                });
            }

            let delay = self.delay(attempt);
            warn!(
                op,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient failure; backing off"
            );
            sleep_or_cancel(delay, cancel).await?;
        }
    }
}
