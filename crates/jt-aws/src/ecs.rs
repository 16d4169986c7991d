use async_trait::async_trait;
use aws_sdk_ecs::types::LaunchType as SdkLaunchType;
use jt_core::{LaunchOutcome, PlatformError, TaskApi};
use jt_model::{LaunchSpec, TaskArn, TaskSnapshot};
use tracing::debug;

use crate::{AwsPlatform, classify::classify, convert};

#[async_trait]
impl TaskApi for AwsPlatform {
    async fn run_task(&self, spec: &LaunchSpec) -> Result<LaunchOutcome, PlatformError> {
        let network = convert::network_configuration(spec)
            .map_err(|e| PlatformError::permanent("run-task", e.to_string()))?;

        let out = self
            .ecs
            .run_task()
            .cluster(&spec.cluster)
            .task_definition(&spec.task_definition)
            .launch_type(SdkLaunchType::from(spec.launch_type.as_str()))
            .count(1)
            .network_configuration(network)
            .set_overrides(convert::task_override(spec))
            .set_started_by(spec.started_by.clone())
            .set_client_token(spec.client_token.clone())
            .send()
            .await
            .map_err(|e| classify("run-task", e))?;

        Ok(LaunchOutcome {
            task_arns: out
                .tasks()
                .iter()
                .filter_map(|t| t.task_arn().map(str::to_owned))
                .collect(),
            failures: out
                .failures()
                .iter()
                .map(|f| {
                    let reason = f.reason().unwrap_or("unknown reason");
                    match f.detail() {
                        Some(detail) => format!("{reason} ({detail})"),
                        None => reason.to_owned(),
                    }
                })
                .collect(),
        })
    }

    async fn describe_task(
        &self,
        cluster: &str,
        task: &TaskArn,
    ) -> Result<Option<TaskSnapshot>, PlatformError> {
        let out = self
            .ecs
            .describe_tasks()
            .cluster(cluster)
            .tasks(task.as_str())
            .send()
            .await
            .map_err(|e| classify("describe-tasks", e))?;

        for failure in out.failures() {
            debug!(reason = failure.reason(), arn = failure.arn(), "describe-tasks failure");
        }

        out.tasks()
            .first()
            .map(|t| convert::snapshot(t, task))
            .transpose()
            .map_err(|e| PlatformError::permanent("describe-tasks", e.to_string()))
    }

    async fn stop_task(
        &self,
        cluster: &str,
        task: &TaskArn,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.ecs
            .stop_task()
            .cluster(cluster)
            .task(task.as_str())
            .reason(reason)
            .send()
            .await
            .map_err(|e| classify("stop-task", e))?;
        Ok(())
    }
}
