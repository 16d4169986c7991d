mod cli;
mod config;
mod console;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use jt_aws::AwsPlatform;
use jt_core::{CoreError, Platform, Session};
use jt_observe::init_logger;
use tracing::{info, warn};

use crate::{
    cli::Cli,
    config::{LauncherConfig, Settings},
    console::ConsoleReporter,
};

/// Conventional status for a run ended by SIGINT before anything started.
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match start(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Cancelled)) => {
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn start(cli: &Cli) -> anyhow::Result<()> {
    let settings = settings(cli).context("invalid configuration")?;
    // Before the runtime exists, so log timestamps can use the local offset.
    init_logger(&settings.logger).context("failed to initialize logging")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?
        .block_on(run(settings))
}

fn settings(cli: &Cli) -> anyhow::Result<Settings> {
    let file = match &cli.config {
        Some(path) => LauncherConfig::load(path)?,
        None => LauncherConfig::default(),
    };
    Ok(file.overlay(cli.overrides()).resolve()?)
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    info!(region = %settings.region, cluster = %settings.session.cluster, "starting");

    let aws = AwsPlatform::load(settings.region.clone(), settings.profile.as_deref()).await;
    let session = Session::new(Platform::from_shared(Arc::new(aws)), settings.session);
    let reporter = ConsoleReporter::stdout();

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C; running until the task ends");
            std::future::pending::<()>().await;
        }
    };

    let stopped = session
        .run(interrupt, &reporter)
        .await
        .context("jacktrip session failed")?;
    info!(task = %stopped.task, log_lines = stopped.log_lines, "task stopped");
    Ok(())
}
