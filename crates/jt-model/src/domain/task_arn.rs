use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Amazon Resource Name of a launched task.
///
/// Accepts both resource forms the platform emits:
/// `task/<cluster>/<id>` and the legacy `task/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskArn {
    raw: String,
    // Byte offset of the resource part inside `raw`.
    resource_at: usize,
}

impl TaskArn {
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let invalid = |reason| ModelError::InvalidArn {
            arn: s.to_string(),
            reason,
        };

        // arn:partition:service:region:account:resource
        let mut parts = s.splitn(6, ':');
        if parts.next() != Some("arn") {
            return Err(invalid("missing 'arn:' prefix"));
        }
        let partition = parts.next().ok_or_else(|| invalid("missing partition"))?;
        let service = parts.next().ok_or_else(|| invalid("missing service"))?;
        let _region = parts.next().ok_or_else(|| invalid("missing region"))?;
        let _account = parts.next().ok_or_else(|| invalid("missing account"))?;
        let resource = parts.next().ok_or_else(|| invalid("missing resource"))?;

        if partition.is_empty() {
            return Err(invalid("empty partition"));
        }
        if service != "ecs" {
            return Err(invalid("not an ECS ARN"));
        }
        let Some(path) = resource.strip_prefix("task/") else {
            return Err(invalid("resource is not a task"));
        };
        if path.is_empty() || path.split('/').any(str::is_empty) || path.split('/').count() > 2 {
            return Err(invalid("malformed task resource"));
        }

        Ok(Self {
            raw: s.to_string(),
            resource_at: s.len() - resource.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resource part, e.g. `task/jacktrip/0f1e2d3c`.
    pub fn resource(&self) -> &str {
        &self.raw[self.resource_at..]
    }

    pub fn task_id(&self) -> &str {
        self.resource().rsplit('/').next().unwrap_or_default()
    }

    /// Cluster name embedded in long-form ARNs.
    pub fn cluster(&self) -> Option<&str> {
        let mut segments = self.resource().split('/').skip(1);
        match (segments.next(), segments.next()) {
            (Some(cluster), Some(_id)) => Some(cluster),
            _ => None,
        }
    }
}

impl FromStr for TaskArn {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaskArn {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaskArn> for String {
    fn from(arn: TaskArn) -> Self {
        arn.raw
    }
}

impl fmt::Display for TaskArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "arn:aws:ecs:us-east-1:123456789012:task/jacktrip/0f1e2d3c4b5a";

    #[test]
    fn parses_long_form() {
        let arn = TaskArn::parse(LONG).unwrap();
        assert_eq!(arn.resource(), "task/jacktrip/0f1e2d3c4b5a");
        assert_eq!(arn.task_id(), "0f1e2d3c4b5a");
        assert_eq!(arn.cluster(), Some("jacktrip"));
        assert_eq!(arn.to_string(), LONG);
    }

    #[test]
    fn parses_legacy_form_without_cluster() {
        let arn = TaskArn::parse("arn:aws:ecs:eu-west-1:123456789012:task/abcdef").unwrap();
        assert_eq!(arn.task_id(), "abcdef");
        assert_eq!(arn.cluster(), None);
    }

    #[test]
    fn rejects_other_resources() {
        assert!(TaskArn::parse("arn:aws:ecs:us-east-1:1:service/jacktrip/x").is_err());
        assert!(TaskArn::parse("arn:aws:ec2:us-east-1:1:task/x").is_err());
        assert!(TaskArn::parse("task/jacktrip/x").is_err());
        assert!(TaskArn::parse("arn:aws:ecs:us-east-1:1:task/").is_err());
        assert!(TaskArn::parse("arn:aws:ecs:us-east-1:1:task/a//b").is_err());
    }

    #[test]
    fn serde_goes_through_validation() {
        let json = serde_json::to_string(&TaskArn::parse(LONG).unwrap()).unwrap();
        assert_eq!(json, format!("\"{LONG}\""));

        let bad: Result<TaskArn, _> = serde_json::from_str(r#""not-an-arn""#);
        assert!(bad.is_err());
    }
}
