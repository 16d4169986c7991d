use serde::{Deserialize, Serialize};

use crate::{ENI_ATTACHMENT_TYPE, ENI_ID_DETAIL, KeyValue, TaskArn, TaskStatus};

/// Point-in-time view of a task as returned by a describe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub arn: TaskArn,
    pub last_status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerInfo>,
}

impl TaskSnapshot {
    pub fn new(arn: TaskArn, last_status: impl Into<TaskStatus>) -> Self {
        Self {
            arn,
            last_status: last_status.into(),
            stopped_reason: None,
            attachments: Vec::new(),
            containers: Vec::new(),
        }
    }

    /// Whether any container already reports an attached network interface.
    ///
    /// Interfaces are attached asynchronously after the task starts, so a
    /// RUNNING task may still have none.
    pub fn has_network_interface(&self) -> bool {
        self.containers
            .iter()
            .any(|c| !c.network_interfaces.is_empty())
    }

    /// Id of the elastic network interface, taken from the task attachments.
    pub fn eni_id(&self) -> Option<&str> {
        self.attachments
            .iter()
            .filter(|a| a.kind == ENI_ATTACHMENT_TYPE)
            .find_map(|a| a.detail(ENI_ID_DETAIL))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: String,
    #[serde(default)]
    pub details: Vec<KeyValue>,
}

impl Attachment {
    pub fn detail(&self, name: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|kv| kv.key() == name)
            .map(|kv| kv.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub name: String,
    /// Attachment ids of the interfaces bound to this container.
    #[serde(default)]
    pub network_interfaces: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arn() -> TaskArn {
        TaskArn::parse("arn:aws:ecs:us-east-1:123456789012:task/jacktrip/abc").unwrap()
    }

    #[test]
    fn eni_id_comes_from_eni_attachment_only() {
        let mut snap = TaskSnapshot::new(arn(), TaskStatus::RUNNING);
        snap.attachments = vec![
            Attachment {
                kind: "ServiceConnect".into(),
                details: vec![KeyValue::new(ENI_ID_DETAIL, "eni-wrong")],
            },
            Attachment {
                kind: ENI_ATTACHMENT_TYPE.into(),
                details: vec![
                    KeyValue::new("subnetId", "subnet-1"),
                    KeyValue::new(ENI_ID_DETAIL, "eni-0123"),
                ],
            },
        ];

        assert_eq!(snap.eni_id(), Some("eni-0123"));
    }

    #[test]
    fn no_attachment_means_no_eni() {
        let snap = TaskSnapshot::new(arn(), TaskStatus::PENDING);
        assert_eq!(snap.eni_id(), None);
        assert!(!snap.has_network_interface());
    }

    #[test]
    fn any_container_interface_counts() {
        let mut snap = TaskSnapshot::new(arn(), TaskStatus::RUNNING);
        snap.containers = vec![
            ContainerInfo {
                name: "sidecar".into(),
                network_interfaces: vec![],
            },
            ContainerInfo {
                name: "jacktrip".into(),
                network_interfaces: vec!["att-1".into()],
            },
        ];
        assert!(snap.has_network_interface());
    }
}
