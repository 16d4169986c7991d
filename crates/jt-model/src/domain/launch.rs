use serde::{Deserialize, Serialize};

use crate::TaskEnv;

/// Subnet and security group the task is placed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResources {
    pub subnet_id: String,
    pub security_group_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchType {
    /// Serverless mode: no container instances to manage.
    #[default]
    Fargate,
}

impl LaunchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchType::Fargate => "FARGATE",
        }
    }
}

/// Everything needed to start exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub cluster: String,
    pub task_definition: String,
    #[serde(default)]
    pub launch_type: LaunchType,
    pub container: String,
    pub network: NetworkResources,
    pub assign_public_ip: bool,
    #[serde(default, skip_serializing_if = "TaskEnv::is_empty")]
    pub env: TaskEnv,
    /// Shows up as `startedBy` on the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    /// Idempotency token; repeating a launch with the same token starts no second task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}
