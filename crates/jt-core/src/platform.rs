//! Seams to the cloud provider.
//!
//! Each method maps onto exactly one provider call; implementations classify
//! their failures into [`ErrorClass`](crate::ErrorClass) and never retry.
use std::sync::Arc;

use async_trait::async_trait;
use jt_model::{LaunchSpec, LogPage, LogQuery, TaskArn, TaskSnapshot};

use crate::PlatformError;

#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Ids of subnets whose `Name` tag equals `tag`, in provider order.
    async fn subnets_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError>;

    /// Ids of security groups whose `Name` tag equals `tag`, in provider order.
    async fn security_groups_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError>;

    /// Public IP associated with the interface; `None` while unassociated.
    async fn public_ip(&self, eni_id: &str) -> Result<Option<String>, PlatformError>;
}

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn run_task(&self, spec: &LaunchSpec) -> Result<LaunchOutcome, PlatformError>;

    /// `None` when the platform no longer reports the task.
    async fn describe_task(
        &self,
        cluster: &str,
        task: &TaskArn,
    ) -> Result<Option<TaskSnapshot>, PlatformError>;

    async fn stop_task(&self, cluster: &str, task: &TaskArn, reason: &str)
    -> Result<(), PlatformError>;
}

#[async_trait]
pub trait LogApi: Send + Sync {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, PlatformError>;
}

/// Result of a run request: started task ARNs and per-task failure reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub task_arns: Vec<String>,
    pub failures: Vec<String>,
}

/// Bundle of provider handles shared by the session components.
#[derive(Clone)]
pub struct Platform {
    pub network: Arc<dyn NetworkApi>,
    pub tasks: Arc<dyn TaskApi>,
    pub logs: Arc<dyn LogApi>,
}

impl Platform {
    /// One value implementing all three traits, e.g. an SDK client bundle.
    pub fn from_shared<P>(provider: Arc<P>) -> Self
    where
        P: NetworkApi + TaskApi + LogApi + 'static,
    {
        Self {
            network: provider.clone(),
            tasks: provider.clone(),
            logs: provider,
        }
    }
}
