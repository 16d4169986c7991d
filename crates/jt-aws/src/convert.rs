//! Conversions between SDK shapes and the domain model.
use aws_sdk_ecs::{
    error::BuildError,
    types::{
        AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, NetworkConfiguration,
        Task, TaskOverride,
    },
};
use jt_model::{Attachment, ContainerInfo, KeyValue, LaunchSpec, ModelError, TaskArn, TaskSnapshot};

pub(crate) fn network_configuration(spec: &LaunchSpec) -> Result<NetworkConfiguration, BuildError> {
    let assign = if spec.assign_public_ip {
        AssignPublicIp::Enabled
    } else {
        AssignPublicIp::Disabled
    };
    let vpc = AwsVpcConfiguration::builder()
        .subnets(&spec.network.subnet_id)
        .security_groups(&spec.network.security_group_id)
        .assign_public_ip(assign)
        .build()?;
    Ok(NetworkConfiguration::builder().awsvpc_configuration(vpc).build())
}

/// Environment override for the launched container; `None` when there is
/// nothing to inject.
pub(crate) fn task_override(spec: &LaunchSpec) -> Option<TaskOverride> {
    if spec.env.is_empty() {
        return None;
    }
    let environment = spec
        .env
        .resolved()
        .into_iter()
        .map(|kv| KeyValuePair::builder().name(kv.key()).value(kv.value()).build())
        .collect();
    let container = ContainerOverride::builder()
        .name(&spec.container)
        .set_environment(Some(environment))
        .build();
    Some(TaskOverride::builder().container_overrides(container).build())
}

/// Snapshot of a described task. `fallback` names the task when the
/// response omits its ARN.
pub(crate) fn snapshot(task: &Task, fallback: &TaskArn) -> Result<TaskSnapshot, ModelError> {
    let arn = match task.task_arn() {
        Some(raw) => TaskArn::parse(raw)?,
        None => fallback.clone(),
    };

    let mut snap = TaskSnapshot::new(arn, task.last_status().unwrap_or_default());
    snap.stopped_reason = task.stopped_reason().map(str::to_owned);
    snap.attachments = task
        .attachments()
        .iter()
        .map(|a| Attachment {
            kind: a.r#type().unwrap_or_default().to_owned(),
            details: a
                .details()
                .iter()
                .filter_map(|d| Some(KeyValue::new(d.name()?, d.value().unwrap_or_default())))
                .collect(),
        })
        .collect();
    snap.containers = task
        .containers()
        .iter()
        .map(|c| ContainerInfo {
            name: c.name().unwrap_or_default().to_owned(),
            network_interfaces: c
                .network_interfaces()
                .iter()
                .filter_map(|ni| ni.attachment_id().or(ni.private_ipv4_address()))
                .map(str::to_owned)
                .collect(),
        })
        .collect();
    Ok(snap)
}
