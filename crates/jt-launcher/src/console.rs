use std::{
    io::{self, IsTerminal, Write},
    net::IpAddr,
    sync::{Mutex, PoisonError},
};

use crossterm::style::Stylize;
use jt_core::Reporter;
use jt_model::{TaskArn, TaskSnapshot, TaskStatus};
use tracing::debug;

/// Progress printed for the person at the terminal.
pub struct ConsoleReporter<W> {
    out: Mutex<W>,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write(&mut *out).and_then(|()| out.flush()) {
            debug!(error = %e, "console write failed");
        }
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn wait_started(&self, task: &TaskArn, target: &TaskStatus) {
        self.emit(|o| write!(o, "Waiting for task {} to reach state {target} ", task.task_id()));
    }

    fn wait_tick(&self) {
        self.emit(|o| write!(o, "."));
    }

    fn wait_finished(&self, _snapshot: &TaskSnapshot) {
        self.emit(|o| writeln!(o, " done!"));
    }

    fn public_ip(&self, ip: IpAddr) {
        let color = self.color;
        self.emit(|o| {
            if color {
                writeln!(o, "This jacktrip server's IP is {}", ip.to_string().bold().red())
            } else {
                writeln!(o, "This jacktrip server's IP is {ip}")
            }
        });
    }

    fn log_line(&self, line: &str) {
        self.emit(|o| writeln!(o, ">>> {line}"));
    }

    fn stopping(&self, task: &TaskArn) {
        self.emit(|o| writeln!(o, "Stopping task {} !", task.task_id()));
    }

    fn stopped(&self, _snapshot: &TaskSnapshot) {
        self.emit(|o| writeln!(o, "BYE!"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARN: &str = "arn:aws:ecs:us-east-1:123456789012:task/jacktrip/5f2c9e";

    fn printed(r: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(r.into_inner()).unwrap()
    }

    #[test]
    fn wait_line_collects_dots() {
        let r = ConsoleReporter::new(Vec::new(), false);
        let arn = TaskArn::parse(ARN).unwrap();
        r.wait_started(&arn, &TaskStatus::running());
        r.wait_tick();
        r.wait_tick();
        r.wait_finished(&TaskSnapshot::new(arn, TaskStatus::RUNNING));

        assert_eq!(
            printed(r),
            "Waiting for task 5f2c9e to reach state RUNNING .. done!\n"
        );
    }

    #[test]
    fn plain_output_without_color() {
        let r = ConsoleReporter::new(Vec::new(), false);
        let arn = TaskArn::parse(ARN).unwrap();
        r.public_ip("54.12.0.7".parse().unwrap());
        r.log_line("hub up");
        r.stopping(&arn);
        r.stopped(&TaskSnapshot::new(arn, TaskStatus::STOPPED));

        assert_eq!(
            printed(r),
            "This jacktrip server's IP is 54.12.0.7\n>>> hub up\nStopping task 5f2c9e !\nBYE!\n"
        );
    }

    #[test]
    fn colored_ip_is_wrapped_in_escapes() {
        let r = ConsoleReporter::new(Vec::new(), true);
        r.public_ip("54.12.0.7".parse().unwrap());

        let out = printed(r);
        assert!(out.contains("\u{1b}["));
        assert!(out.contains("54.12.0.7"));
    }
}
