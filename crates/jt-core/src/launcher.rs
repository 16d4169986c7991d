use std::sync::Arc;

use jt_model::{LaunchSpec, TaskArn};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{CoreError, RetryPolicy, TaskApi};

/// Starts exactly one task from a [`LaunchSpec`].
pub struct TaskLauncher {
    tasks: Arc<dyn TaskApi>,
    retry: RetryPolicy,
}

impl TaskLauncher {
    pub fn new(tasks: Arc<dyn TaskApi>, retry: RetryPolicy) -> Self {
        Self { tasks, retry }
    }

    /// Retries are only safe when the launch carries a client token;
    /// without one, transient failures are not retried.
    #[instrument(
        level = "debug",
        skip_all,
        fields(cluster = %spec.cluster, definition = %spec.task_definition)
    )]
    pub async fn launch(
        &self,
        spec: &LaunchSpec,
        cancel: &CancellationToken,
    ) -> Result<TaskArn, CoreError> {
        let tasks = &*self.tasks;
        let retry = if spec.client_token.is_some() {
            self.retry.clone()
        } else {
            RetryPolicy::never()
        };

        let outcome = retry.run("run-task", cancel, || tasks.run_task(spec)).await?;

        let mut arns = outcome.task_arns.into_iter();
        let Some(raw) = arns.next() else {
            let reason = if outcome.failures.is_empty() {
                "no task returned".to_string()
            } else {
                outcome.failures.join("; ")
            };
            return Err(CoreError::LaunchRejected(reason));
        };
        if arns.next().is_some() {
            warn!("platform started more than one task; tracking the first");
        }

        let arn = TaskArn::parse(&raw)?;
        info!(task = %arn, cluster = arn.cluster().unwrap_or("-"), "task launched");
        Ok(arn)
    }
}
