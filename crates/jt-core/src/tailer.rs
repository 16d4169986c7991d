//! Forward-only tailing of a task's log stream.
//!
//! The tailer runs as its own Tokio task and hands lines to a single consumer
//! over a bounded channel. A full channel suspends fetching, so a slow
//! consumer throttles the tailer instead of growing a buffer.
use std::{sync::Arc, time::Duration};

use jt_model::{LogPage, LogQuery, LogStream};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::{CoreError, LogApi, RetryPolicy, poll::sleep_or_cancel};

#[derive(Debug, Clone, PartialEq)]
pub struct TailerConfig {
    /// Events requested per fetch.
    pub page_size: u32,
    /// Pause after a fetch that returned no events.
    pub idle_interval: Duration,
    /// Pause between attempts while the stream does not exist yet.
    pub stream_retry_delay: Duration,
    /// Capacity of the hand-off channel.
    pub buffer: usize,
    pub retry: RetryPolicy,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            idle_interval: Duration::from_secs(1),
            stream_retry_delay: Duration::from_secs(1),
            buffer: 256,
            retry: RetryPolicy::default(),
        }
    }
}

/// Forward token plus the number of lines seen so far.
///
/// The token is only forwarded once at least one event has been observed;
/// until then every fetch re-reads the stream from its head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCursor {
    token: Option<String>,
    seen: u64,
}

impl LogCursor {
    pub fn next_token(&self) -> Option<&str> {
        if self.seen > 0 { self.token.as_deref() } else { None }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn advance(&mut self, page: &LogPage) {
        self.seen += page.events.len() as u64;
        if let Some(token) = &page.next_forward_token {
            self.token = Some(token.clone());
        }
    }
}

pub struct LogTailer {
    logs: Arc<dyn LogApi>,
    stream: LogStream,
    cfg: TailerConfig,
}

impl LogTailer {
    pub fn new(logs: Arc<dyn LogApi>, stream: LogStream, cfg: TailerConfig) -> Self {
        Self { logs, stream, cfg }
    }

    /// Starts tailing in the background.
    ///
    /// The handle resolves to the number of lines observed once `cancel`
    /// fires or the receiver is dropped, or to the error that ended tailing.
    pub fn spawn(
        self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<String>, JoinHandle<Result<u64, CoreError>>) {
        let (tx, rx) = mpsc::channel(self.cfg.buffer.max(1));
        let handle = tokio::spawn(async move { self.run(tx, cancel).await });
        (rx, handle)
    }

    #[instrument(
        level = "debug",
        name = "tail",
        skip_all,
        fields(group = %self.stream.group, stream = %self.stream.name)
    )]
    pub async fn run(
        self,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> Result<u64, CoreError> {
        let mut cursor = LogCursor::default();
        match self.tail(&tx, &cancel, &mut cursor).await {
            Err(CoreError::Cancelled) => {
                debug!(lines = cursor.seen(), "tailing cancelled");
                Ok(cursor.seen())
            }
            other => other,
        }
    }

    async fn tail(
        &self,
        tx: &mpsc::Sender<String>,
        cancel: &CancellationToken,
        cursor: &mut LogCursor,
    ) -> Result<u64, CoreError> {
        let logs = &*self.logs;
        let mut waiting_for_stream = false;

        loop {
            let query = LogQuery {
                stream: self.stream.clone(),
                limit: self.cfg.page_size,
                next_token: cursor.next_token().map(str::to_owned),
            };

            let page = match self
                .cfg
                .retry
                .run("get-log-events", cancel, || logs.get_log_events(&query))
                .await
            {
                Ok(page) => page,
                Err(CoreError::Platform(e)) if e.is_not_found() => {
                    if !waiting_for_stream {
                        debug!("log stream not created yet");
                        waiting_for_stream = true;
                    }
                    sleep_or_cancel(self.cfg.stream_retry_delay, cancel).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            waiting_for_stream = false;

            let fetched = page.events.len();
            cursor.advance(&page);
            trace!(fetched, total = cursor.seen(), "log page received");

            for line in page.events {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                    sent = tx.send(line) => {
                        if sent.is_err() {
                            debug!("log consumer went away");
                            return Ok(cursor.seen());
                        }
                    }
                }
            }

            if fetched == 0 {
                sleep_or_cancel(self.cfg.idle_interval, cancel).await?;
            }
        }
    }
}
