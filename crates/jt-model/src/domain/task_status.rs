use std::fmt;

use serde::{Deserialize, Serialize};

/// Last status reported by the platform for a task.
///
/// Kept as an opaque string: the platform owns the lifecycle and may report
/// values this program does not know about. The well-known values are
/// provided as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    pub const PROVISIONING: &'static str = "PROVISIONING";
    pub const PENDING: &'static str = "PENDING";
    pub const ACTIVATING: &'static str = "ACTIVATING";
    pub const RUNNING: &'static str = "RUNNING";
    pub const DEACTIVATING: &'static str = "DEACTIVATING";
    pub const STOPPING: &'static str = "STOPPING";
    pub const DEPROVISIONING: &'static str = "DEPROVISIONING";
    pub const STOPPED: &'static str = "STOPPED";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn running() -> Self {
        Self::new(Self::RUNNING)
    }

    pub fn stopped() -> Self {
        Self::new(Self::STOPPED)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` once the task can no longer move to another state.
    pub fn is_terminal(&self) -> bool {
        self.0 == Self::STOPPED
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for TaskStatus {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stopped_is_terminal() {
        assert!(TaskStatus::stopped().is_terminal());
        assert!(!TaskStatus::running().is_terminal());
        assert!(!TaskStatus::from(TaskStatus::DEPROVISIONING).is_terminal());
    }

    #[test]
    fn unknown_values_are_preserved() {
        let status = TaskStatus::from("HIBERNATING");
        assert_eq!(status.as_str(), "HIBERNATING");
        assert_eq!(&status, "HIBERNATING");
    }
}
