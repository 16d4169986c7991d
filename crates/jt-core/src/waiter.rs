use std::sync::Arc;

use jt_model::{TaskArn, TaskSnapshot, TaskStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::{
    CoreError, PollConfig, Reporter, TaskApi,
    poll::{bounded, sleep_or_cancel},
};

/// Polls a task until its last status equals a target.
pub struct StateWaiter {
    tasks: Arc<dyn TaskApi>,
    cluster: String,
    poll: PollConfig,
}

impl StateWaiter {
    pub fn new(tasks: Arc<dyn TaskApi>, cluster: impl Into<String>, poll: PollConfig) -> Self {
        Self {
            tasks,
            cluster: cluster.into(),
            poll,
        }
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Returns the snapshot of the first poll that observed `target`.
    ///
    /// Every poll before that reports one [`Reporter::wait_tick`] and sleeps
    /// the poll interval. Waiting for anything but STOPPED on a task that has
    /// already stopped fails instead of waiting forever.
    #[instrument(level = "debug", skip_all, fields(task = %task.task_id(), target = %target))]
    pub async fn wait_for(
        &self,
        task: &TaskArn,
        target: &TaskStatus,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<TaskSnapshot, CoreError> {
        reporter.wait_started(task, target);

        let what = || format!("task {} to reach {target}", task.task_id());
        let snapshot = bounded(self.poll.timeout, what, async {
            let mut polls = 0u32;
            loop {
                let snap = self.describe(task, cancel).await?;
                polls += 1;
                trace!(polls, status = %snap.last_status, "polled task status");

                if snap.last_status == *target {
                    return Ok(snap);
                }
                if snap.last_status.is_terminal() && !target.is_terminal() {
                    return Err(CoreError::UnexpectedStop {
                        task: task.task_id().to_string(),
                        target: target.clone(),
                        reason: snap
                            .stopped_reason
                            .unwrap_or_else(|| "no reason reported".to_string()),
                    });
                }

                reporter.wait_tick();
                sleep_or_cancel(self.poll.interval, cancel).await?;
            }
        })
        .await?;

        debug!("target status reached");
        reporter.wait_finished(&snapshot);
        Ok(snapshot)
    }

    /// Current snapshot of `task`, with transient failures retried.
    ///
    /// A task missing from the response is polled again up to
    /// `missing_grace` times before it is reported as gone.
    pub(crate) async fn describe(
        &self,
        task: &TaskArn,
        cancel: &CancellationToken,
    ) -> Result<TaskSnapshot, CoreError> {
        let tasks = &*self.tasks;
        let cluster = self.cluster.as_str();
        let mut misses = 0u32;
        loop {
            let found = self
                .poll
                .retry
                .run("describe-tasks", cancel, || tasks.describe_task(cluster, task))
                .await?;
            match found {
                Some(snap) => return Ok(snap),
                None if misses < self.poll.missing_grace => {
                    misses += 1;
                    debug!(misses, "task not visible yet");
                    sleep_or_cancel(self.poll.interval, cancel).await?;
                }
                None => return Err(CoreError::MissingTask(task.to_string())),
            }
        }
    }
}
