use serde::{Deserialize, Serialize};

use crate::TaskArn;

/// Location of a task's log stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStream {
    pub group: String,
    pub name: String,
}

impl LogStream {
    /// Stream written by the awslogs driver for `container` of `task`:
    /// `<prefix>/<container>/<task-id>`.
    pub fn for_task(
        group: impl Into<String>,
        prefix: &str,
        container: &str,
        task: &TaskArn,
    ) -> Self {
        Self {
            group: group.into(),
            name: format!("{prefix}/{container}/{}", task.task_id()),
        }
    }
}

/// One `get-log-events` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub stream: LogStream,
    pub limit: u32,
    /// Forward token from a previous page; `None` reads from the head.
    pub next_token: Option<String>,
}

/// One page of log events, in the order the platform returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPage {
    pub events: Vec<String>,
    pub next_forward_token: Option<String>,
}
