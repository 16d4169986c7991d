use std::sync::Arc;

use jt_model::{TaskArn, TaskSnapshot, TaskStatus};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{CoreError, Reporter, RetryPolicy, StateWaiter, TaskApi};

/// Stops a launched task and waits until the platform reports it STOPPED.
pub struct InterruptHandler {
    tasks: Arc<dyn TaskApi>,
    waiter: Arc<StateWaiter>,
    cluster: String,
    reason: String,
    retry: RetryPolicy,
}

impl InterruptHandler {
    pub fn new(
        tasks: Arc<dyn TaskApi>,
        waiter: Arc<StateWaiter>,
        cluster: impl Into<String>,
        reason: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            tasks,
            waiter,
            cluster: cluster.into(),
            reason: reason.into(),
            retry,
        }
    }

    /// Issues a single stop request and waits for STOPPED.
    ///
    /// Only transient failures of the stop call are retried; stopping an
    /// already stopping task is accepted by the platform.
    #[instrument(level = "debug", skip_all, fields(task = %task.task_id()))]
    pub async fn stop(
        &self,
        task: &TaskArn,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<TaskSnapshot, CoreError> {
        reporter.stopping(task);

        let tasks = &*self.tasks;
        let cluster = self.cluster.as_str();
        let reason = self.reason.as_str();
        self.retry
            .run("stop-task", cancel, || tasks.stop_task(cluster, task, reason))
            .await?;
        info!("stop requested");

        let snapshot = self
            .waiter
            .wait_for(task, &TaskStatus::stopped(), reporter, cancel)
            .await?;

        reporter.stopped(&snapshot);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        JitterStrategy, PlatformError, PollConfig,
        mock::{ARN, MockPlatform, Recorder, arn, snapshot},
    };

    fn handler(mock: &Arc<MockPlatform>) -> InterruptHandler {
        let retry = RetryPolicy {
            jitter: JitterStrategy::None,
            ..RetryPolicy::default()
        };
        let waiter = Arc::new(StateWaiter::new(
            mock.clone(),
            "jacktrip",
            PollConfig {
                interval: Duration::from_secs(1),
                timeout: Some(Duration::from_secs(60)),
                retry: retry.clone(),
                ..PollConfig::default()
            },
        ));
        InterruptHandler::new(mock.clone(), waiter, "jacktrip", "interrupted", retry)
    }

    #[tokio::test(start_paused = true)]
    async fn stops_once_and_waits_for_stopped() {
        let mock = MockPlatform::new();
        mock.with(|s| {
            s.describes.push_back(Ok(Some(snapshot(TaskStatus::DEACTIVATING))));
            s.describes.push_back(Ok(Some(snapshot(TaskStatus::STOPPING))));
            s.describes.push_back(Ok(Some(snapshot(TaskStatus::STOPPED))));
        });
        let recorder = Recorder::default();

        let snap = handler(&mock)
            .stop(&arn(), &recorder, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(snap.last_status, TaskStatus::stopped());
        mock.with(|s| {
            assert_eq!(s.stop_requests, vec![("jacktrip".to_string(), ARN.to_string())]);
            assert_eq!(s.describe_calls, 3);
        });
        assert_eq!(
            recorder.events(),
            vec!["stopping", "wait:STOPPED", "tick", "tick", "reached:STOPPED", "bye"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn transient_stop_failure_is_retried() {
        let mock = MockPlatform::new();
        mock.with(|s| {
            s.stop_results
                .push_back(Err(PlatformError::transient("stop-task", "throttled")));
            s.after_stop = Some(snapshot(TaskStatus::STOPPED));
        });

        handler(&mock)
            .stop(&arn(), &Recorder::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(mock.with(|s| s.stop_requests.len()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_stop_skips_the_wait() {
        let mock = MockPlatform::new();
        mock.with(|s| {
            s.stop_results
                .push_back(Err(PlatformError::permanent("stop-task", "AccessDenied")));
        });
        let recorder = Recorder::default();

        let err = handler(&mock)
            .stop(&arn(), &recorder, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Platform(_)));
        assert_eq!(mock.with(|s| s.describe_calls), 0);
        assert_eq!(recorder.events(), vec!["stopping"]);
    }
}
