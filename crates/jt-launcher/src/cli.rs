use std::path::PathBuf;

use clap::Parser;
use jt_model::KeyValue;
use jt_observe::LoggerFormat;

use crate::config::LauncherConfig;

/// Launch a JackTrip hub server on ECS Fargate, print its public IP and
/// stream its logs until Ctrl-C stops it again.
#[derive(Debug, Parser)]
#[command(name = "jacktrip-launch", version, about)]
pub struct Cli {
    /// AWS region [default: us-east-1]
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named AWS profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Hub auto-patch mode passed to the server as HUB_PATCH [default: 2]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub hubpatch: Option<u8>,

    /// Extra container environment (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<KeyValue>,

    /// ECS cluster [default: jacktrip]
    #[arg(long)]
    pub cluster: Option<String>,

    /// Task definition family or ARN [default: run-jacktrip]
    #[arg(long)]
    pub task_definition: Option<String>,

    /// Container receiving the environment override [default: jacktrip]
    #[arg(long)]
    pub container: Option<String>,

    /// CloudWatch log group [default: /ecs/run-jacktrip]
    #[arg(long)]
    pub log_group: Option<String>,

    /// awslogs stream prefix [default: ecs]
    #[arg(long)]
    pub log_stream_prefix: Option<String>,

    /// Name tag of the subnet and security group [default: jacktrip]
    #[arg(long)]
    pub tag: Option<String>,

    /// JSON file with any of the above settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Delay between status polls [default: 1000]
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Give up waiting for a status after this long, 0 waits forever [default: 600]
    #[arg(long)]
    pub wait_timeout_secs: Option<u64>,

    /// Leave the task running when the launcher fails
    #[arg(long)]
    pub no_stop_on_error: bool,

    /// Diagnostic log filter, e.g. "info" or "jt_core=debug" [default: warn]
    #[arg(long, env = "JACKTRIP_LOG")]
    pub log_level: Option<String>,

    /// Diagnostic log format: text, json or journald
    #[arg(long)]
    pub log_format: Option<LoggerFormat>,
}

impl Cli {
    /// Settings given on the command line, to be laid over the file.
    pub fn overrides(&self) -> LauncherConfig {
        LauncherConfig {
            region: self.region.clone(),
            profile: self.profile.clone(),
            hubpatch: self.hubpatch,
            env: self.env.iter().cloned().collect(),
            cluster: self.cluster.clone(),
            task_definition: self.task_definition.clone(),
            container: self.container.clone(),
            log_group: self.log_group.clone(),
            log_stream_prefix: self.log_stream_prefix.clone(),
            tag: self.tag.clone(),
            poll_interval_ms: self.poll_interval_ms,
            wait_timeout_secs: self.wait_timeout_secs,
            stop_on_error: self.no_stop_on_error.then_some(false),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            ..LauncherConfig::default()
        }
    }
}
