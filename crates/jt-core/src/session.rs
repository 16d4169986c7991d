//! One launch-to-teardown run against a [`Platform`].
use std::{future::Future, net::IpAddr, pin::Pin, sync::Arc, time::Duration};

use jt_model::{
    LaunchSpec, LaunchType, LogStream, NetworkResources, TaskArn, TaskEnv, TaskSnapshot, TaskStatus,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    CoreError, InterruptHandler, LogTailer, NetworkResolver, Platform, PollConfig, Reporter,
    ResourceLocator, StateWaiter, TailerConfig, TaskLauncher,
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cluster: String,
    pub task_definition: String,
    pub container: String,
    /// `Name` tag shared by the subnet and the security group.
    pub resource_tag: String,
    pub log_group: String,
    pub log_stream_prefix: String,

    pub assign_public_ip: bool,
    pub env: TaskEnv,
    pub started_by: Option<String>,

    pub poll: PollConfig,
    /// Deadline for reaching STOPPED after an interrupt.
    pub stop_timeout: Option<Duration>,
    pub tailer: TailerConfig,
    /// Request a stop when the run fails after the task was launched.
    pub stop_on_error: bool,
    pub stop_reason: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cluster: "jacktrip".into(),
            task_definition: "run-jacktrip".into(),
            container: "jacktrip".into(),
            resource_tag: "jacktrip".into(),
            log_group: "/ecs/run-jacktrip".into(),
            log_stream_prefix: "ecs".into(),
            assign_public_ip: true,
            env: TaskEnv::new(),
            started_by: Some("jacktrip-launch".into()),
            poll: PollConfig::default(),
            stop_timeout: Some(Duration::from_secs(300)),
            tailer: TailerConfig::default(),
            stop_on_error: true,
            stop_reason: "stopped by jacktrip-launch".into(),
        }
    }
}

/// Summary of a run that ended with the task stopped on request.
#[derive(Debug, Clone)]
pub struct Stopped {
    pub task: TaskArn,
    pub snapshot: TaskSnapshot,
    /// Log lines displayed before the interrupt.
    pub log_lines: u64,
}

pub struct Session {
    platform: Platform,
    cfg: SessionConfig,
    locator: ResourceLocator,
    launcher: TaskLauncher,
    waiter: Arc<StateWaiter>,
    resolver: NetworkResolver,
    stopper: InterruptHandler,
}

impl Session {
    pub fn new(platform: Platform, cfg: SessionConfig) -> Self {
        let retry = cfg.poll.retry.clone();
        let waiter = Arc::new(StateWaiter::new(
            platform.tasks.clone(),
            cfg.cluster.clone(),
            cfg.poll.clone(),
        ));
        let stop_waiter = Arc::new(StateWaiter::new(
            platform.tasks.clone(),
            cfg.cluster.clone(),
            PollConfig {
                timeout: cfg.stop_timeout,
                ..cfg.poll.clone()
            },
        ));

        Self {
            locator: ResourceLocator::new(platform.network.clone(), retry.clone()),
            launcher: TaskLauncher::new(platform.tasks.clone(), retry.clone()),
            resolver: NetworkResolver::new(platform.network.clone(), waiter.clone()),
            stopper: InterruptHandler::new(
                platform.tasks.clone(),
                stop_waiter,
                cfg.cluster.clone(),
                cfg.stop_reason.clone(),
                retry,
            ),
            waiter,
            platform,
            cfg,
        }
    }

    /// Runs until `interrupt` resolves, then stops the task.
    ///
    /// An interrupt while network resources are looked up yields
    /// [`CoreError::Cancelled`]. Once the run request is sent it is allowed
    /// to finish, so an interrupt during the launch stops the new task
    /// right away instead of leaving it running.
    #[instrument(name = "session", skip_all, fields(cluster = %self.cfg.cluster))]
    pub async fn run<I>(&self, interrupt: I, reporter: &dyn Reporter) -> Result<Stopped, CoreError>
    where
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        let cancel = CancellationToken::new();

        let network = tokio::select! {
            biased;
            _ = &mut interrupt => {
                info!("interrupted before launch");
                return Err(CoreError::Cancelled);
            }
            network = self.locator.locate(&self.cfg.resource_tag, &cancel) => network?,
        };
        info!(
            subnet = %network.subnet_id,
            group = %network.security_group_id,
            "network resources located"
        );

        let spec = self.launch_spec(network);
        let launch = self.launcher.launch(&spec, &cancel);
        tokio::pin!(launch);
        let mut interrupted = false;
        let task = loop {
            tokio::select! {
                biased;
                _ = &mut interrupt, if !interrupted => {
                    info!("interrupted during launch; stopping the task once it exists");
                    interrupted = true;
                }
                task = &mut launch => break task?,
            }
        };

        if interrupted {
            let snapshot = self.stopper.stop(&task, reporter, &CancellationToken::new()).await?;
            return Ok(Stopped {
                task,
                snapshot,
                log_lines: 0,
            });
        }

        let work = cancel.child_token();
        let supervised = self.supervise(&task, interrupt.as_mut(), reporter, &work).await;
        work.cancel();

        match supervised {
            Ok(log_lines) => {
                info!(task = %task.task_id(), log_lines, "interrupt received; stopping task");
                let snapshot = self.stopper.stop(&task, reporter, &CancellationToken::new()).await?;
                Ok(Stopped {
                    task,
                    snapshot,
                    log_lines,
                })
            }
            Err(err) => {
                error!(task = %task.task_id(), error = %err, "session failed after launch");
                if self.cfg.stop_on_error {
                    self.stop_best_effort(&task).await;
                }
                Err(err)
            }
        }
    }

    /// Launch request for the located network resources.
    ///
    /// Each call carries a fresh client token.
    pub fn launch_spec(&self, network: NetworkResources) -> LaunchSpec {
        LaunchSpec {
            cluster: self.cfg.cluster.clone(),
            task_definition: self.cfg.task_definition.clone(),
            launch_type: LaunchType::Fargate,
            container: self.cfg.container.clone(),
            network,
            assign_public_ip: self.cfg.assign_public_ip,
            env: self.cfg.env.resolved().into_iter().collect(),
            started_by: self.cfg.started_by.clone(),
            client_token: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Displays logs and the public address until `interrupt` fires.
    /// Returns the number of log lines shown.
    async fn supervise<I>(
        &self,
        task: &TaskArn,
        mut interrupt: Pin<&mut I>,
        reporter: &dyn Reporter,
        cancel: &CancellationToken,
    ) -> Result<u64, CoreError>
    where
        I: Future<Output = ()>,
    {
        let stream = LogStream::for_task(
            self.cfg.log_group.clone(),
            &self.cfg.log_stream_prefix,
            &self.cfg.container,
            task,
        );
        let tailer = LogTailer::new(self.platform.logs.clone(), stream, self.cfg.tailer.clone());
        let (mut lines, mut tailing) = tailer.spawn(cancel.child_token());

        let address = async {
            self.waiter
                .wait_for(task, &TaskStatus::running(), reporter, cancel)
                .await?;
            self.resolver.resolve(task, cancel).await
        };
        tokio::pin!(address);

        let mut resolved: Option<IpAddr> = None;
        let mut shown = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => break,
                ip = &mut address, if resolved.is_none() => {
                    let ip = ip?;
                    reporter.public_ip(ip);
                    resolved = Some(ip);
                }
                line = lines.recv() => match line {
                    Some(line) => {
                        shown += 1;
                        reporter.log_line(&line);
                    }
                    None => return Err(tailer_failure(&mut tailing).await),
                },
            }
        }

        cancel.cancel();
        if let Err(e) = tailing.await {
            warn!(error = %e, "log tailer did not shut down cleanly");
        }
        Ok(shown)
    }

    async fn stop_best_effort(&self, task: &TaskArn) {
        let tasks = &self.platform.tasks;
        match tasks
            .stop_task(&self.cfg.cluster, task, &self.cfg.stop_reason)
            .await
        {
            Ok(()) => warn!(
                task = %task.task_id(),
                "stop requested after failure; not waiting for STOPPED"
            ),
            Err(e) => error!(
                task = %task.task_id(),
                error = %e,
                "could not stop task; it may still be running"
            ),
        }
    }
}

/// Why the line channel closed while the session was still reading it.
async fn tailer_failure(handle: &mut JoinHandle<Result<u64, CoreError>>) -> CoreError {
    match handle.await {
        Ok(Err(e)) => e,
        Ok(Ok(_)) => CoreError::TailerEnded("log channel closed".into()),
        Err(e) => CoreError::TailerEnded(e.to_string()),
    }
}
