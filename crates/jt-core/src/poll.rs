use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{CoreError, RetryPolicy};

/// Pacing shared by every status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Sleep between two describe calls.
    pub interval: Duration,
    /// Upper bound for a whole wait; `None` waits until cancelled.
    pub timeout: Option<Duration>,
    /// Applied to each individual describe call.
    pub retry: RetryPolicy,
    /// Consecutive describes allowed to miss the task before it counts as
    /// gone. A task is not always visible right after it was started.
    pub missing_grace: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Some(Duration::from_secs(600)),
            retry: RetryPolicy::default(),
            missing_grace: 3,
        }
    }
}

/// Sleeps for `delay` unless `cancel` fires first.
///
/// A zero delay still yields once so tight loops stay cancellable.
pub(crate) async fn sleep_or_cancel(
    delay: Duration,
    cancel: &CancellationToken,
) -> Result<(), CoreError> {
    if delay.is_zero() {
        tokio::task::yield_now().await;
        return if cancel.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        };
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CoreError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Runs `fut` under an optional deadline.
pub(crate) async fn bounded<T, F>(
    timeout: Option<Duration>,
    what: impl FnOnce() -> String,
    fut: F,
) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    match timeout {
        None => fut.await,
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| CoreError::Timeout {
                what: what(),
                after: limit,
            })?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bounded_times_out() {
        let err = bounded(Some(Duration::from_secs(5)), || "nothing".to_string(), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, CoreError>(())
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Timeout { what, after }
                if what == "nothing" && after == Duration::from_secs(5)
        ));
    }

    #[tokio::test]
    async fn zero_sleep_observes_cancellation() {
        let cancel = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::ZERO, &cancel).await.is_ok());
        cancel.cancel();
        assert!(matches!(
            sleep_or_cancel(Duration::ZERO, &cancel).await,
            Err(CoreError::Cancelled)
        ));
    }
}
