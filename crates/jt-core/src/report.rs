use std::net::IpAddr;

use jt_model::{TaskArn, TaskSnapshot, TaskStatus};

/// Receives the human-facing progress of a session.
///
/// Diagnostics go through `tracing`; this is the console channel.
/// All methods default to doing nothing.
pub trait Reporter: Send + Sync {
    fn wait_started(&self, _task: &TaskArn, _target: &TaskStatus) {}

    /// One poll that did not yet observe the target status.
    fn wait_tick(&self) {}

    fn wait_finished(&self, _snapshot: &TaskSnapshot) {}

    fn public_ip(&self, _ip: IpAddr) {}

    fn log_line(&self, _line: &str) {}

    fn stopping(&self, _task: &TaskArn) {}

    fn stopped(&self, _snapshot: &TaskSnapshot) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {}
