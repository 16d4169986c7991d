//! Scripted in-memory provider for unit tests.
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use jt_model::{
    Attachment, ContainerInfo, ENI_ATTACHMENT_TYPE, ENI_ID_DETAIL, KeyValue, LaunchSpec, LogPage,
    LogQuery, TaskArn, TaskSnapshot, TaskStatus,
};

use crate::{LaunchOutcome, LogApi, NetworkApi, Platform, PlatformError, TaskApi};

pub(crate) const ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/jacktrip/5f2c9e";

pub(crate) fn arn() -> TaskArn {
    TaskArn::parse(ARN).unwrap()
}

pub(crate) fn snapshot(status: &str) -> TaskSnapshot {
    TaskSnapshot::new(arn(), status)
}

/// RUNNING snapshot with the ENI attached and reported on the container.
pub(crate) fn attached(eni: &str) -> TaskSnapshot {
    let mut snap = snapshot(TaskStatus::RUNNING);
    snap.attachments = vec![Attachment {
        kind: ENI_ATTACHMENT_TYPE.into(),
        details: vec![KeyValue::new(ENI_ID_DETAIL, eni)],
    }];
    snap.containers = vec![ContainerInfo {
        name: "jacktrip".into(),
        network_interfaces: vec!["attachment-1".into()],
    }];
    snap
}

pub(crate) fn page(events: &[&str], token: Option<&str>) -> LogPage {
    LogPage {
        events: events.iter().map(|s| s.to_string()).collect(),
        next_forward_token: token.map(str::to_string),
    }
}

#[derive(Default)]
pub(crate) struct State {
    pub subnets: Vec<String>,
    pub groups: Vec<String>,
    pub tag_queries: Vec<String>,

    pub launches: VecDeque<Result<LaunchOutcome, PlatformError>>,
    pub run_requests: Vec<LaunchSpec>,

    /// Served in order; the last served snapshot repeats once drained.
    pub describes: VecDeque<Result<Option<TaskSnapshot>, PlatformError>>,
    pub last_described: Option<TaskSnapshot>,
    pub describe_calls: usize,
    /// Served by every describe once a stop was requested.
    pub after_stop: Option<TaskSnapshot>,

    pub stop_results: VecDeque<Result<(), PlatformError>>,
    pub stop_requests: Vec<(String, String)>,

    pub public_ips: VecDeque<Result<Option<String>, PlatformError>>,
    pub eni_queries: Vec<String>,

    pub log_pages: VecDeque<Result<LogPage, PlatformError>>,
    pub log_queries: Vec<LogQuery>,
}

#[derive(Default)]
pub(crate) struct MockPlatform {
    pub state: Mutex<State>,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn platform(self: &Arc<Self>) -> Platform {
        Platform::from_shared(self.clone())
    }
}

#[async_trait]
impl NetworkApi for MockPlatform {
    async fn subnets_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError> {
        self.with(|s| {
            s.tag_queries.push(tag.to_string());
            Ok(s.subnets.clone())
        })
    }

    async fn security_groups_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError> {
        self.with(|s| {
            s.tag_queries.push(tag.to_string());
            Ok(s.groups.clone())
        })
    }

    async fn public_ip(&self, eni_id: &str) -> Result<Option<String>, PlatformError> {
        self.with(|s| {
            s.eni_queries.push(eni_id.to_string());
            s.public_ips.pop_front().unwrap_or(Ok(None))
        })
    }
}

#[async_trait]
impl TaskApi for MockPlatform {
    async fn run_task(&self, spec: &LaunchSpec) -> Result<LaunchOutcome, PlatformError> {
        self.with(|s| {
            s.run_requests.push(spec.clone());
            s.launches.pop_front().unwrap_or_else(|| {
                Ok(LaunchOutcome {
                    task_arns: vec![ARN.to_string()],
                    failures: vec![],
                })
            })
        })
    }

    async fn describe_task(
        &self,
        _cluster: &str,
        _task: &TaskArn,
    ) -> Result<Option<TaskSnapshot>, PlatformError> {
        self.with(|s| {
            s.describe_calls += 1;
            if !s.stop_requests.is_empty()
                && let Some(snap) = &s.after_stop
            {
                return Ok(Some(snap.clone()));
            }
            match s.describes.pop_front() {
                Some(Ok(snap)) => {
                    s.last_described = snap.clone();
                    Ok(snap)
                }
                Some(Err(e)) => Err(e),
                None => Ok(s.last_described.clone()),
            }
        })
    }

    async fn stop_task(
        &self,
        cluster: &str,
        task: &TaskArn,
        _reason: &str,
    ) -> Result<(), PlatformError> {
        self.with(|s| {
            s.stop_requests
                .push((cluster.to_string(), task.to_string()));
            s.stop_results.pop_front().unwrap_or(Ok(()))
        })
    }
}

#[async_trait]
impl LogApi for MockPlatform {
    async fn get_log_events(&self, query: &LogQuery) -> Result<LogPage, PlatformError> {
        self.with(|s| {
            s.log_queries.push(query.clone());
            s.log_pages.pop_front().unwrap_or_else(|| {
                Ok(LogPage {
                    events: vec![],
                    next_forward_token: query.next_token.clone(),
                })
            })
        })
    }
}

/// Reporter that records every callback as a short string.
#[derive(Default)]
pub(crate) struct Recorder {
    pub events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == name).count()
    }

    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl crate::Reporter for Recorder {
    fn wait_started(&self, _task: &TaskArn, target: &TaskStatus) {
        self.push(format!("wait:{target}"));
    }

    fn wait_tick(&self) {
        self.push("tick".into());
    }

    fn wait_finished(&self, snapshot: &TaskSnapshot) {
        self.push(format!("reached:{}", snapshot.last_status));
    }

    fn public_ip(&self, ip: std::net::IpAddr) {
        self.push(format!("ip:{ip}"));
    }

    fn log_line(&self, line: &str) {
        self.push(format!(">>> {line}"));
    }

    fn stopping(&self, _task: &TaskArn) {
        self.push("stopping".into());
    }

    fn stopped(&self, _snapshot: &TaskSnapshot) {
        self.push("bye".into());
    }
}
