use std::{net::IpAddr, sync::Arc};

use jt_model::{TaskArn, TaskStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    CoreError, NetworkApi, StateWaiter,
    poll::{bounded, sleep_or_cancel},
};

/// Finds the public address of a running task.
///
/// The interface is attached asynchronously after the task reports RUNNING
/// and the public association can lag behind the attachment, so both are
/// polled at the waiter's interval under the waiter's deadline.
pub struct NetworkResolver {
    network: Arc<dyn NetworkApi>,
    waiter: Arc<StateWaiter>,
}

impl NetworkResolver {
    pub fn new(network: Arc<dyn NetworkApi>, waiter: Arc<StateWaiter>) -> Self {
        Self { network, waiter }
    }

    #[instrument(level = "debug", skip_all, fields(task = %task.task_id()))]
    pub async fn resolve(
        &self,
        task: &TaskArn,
        cancel: &CancellationToken,
    ) -> Result<IpAddr, CoreError> {
        let poll = self.waiter.poll_config();
        let network = &*self.network;
        let what = || format!("public IP of task {}", task.task_id());

        bounded(poll.timeout, what, async {
            loop {
                let snap = self.waiter.describe(task, cancel).await?;
                if snap.last_status.is_terminal() {
                    return Err(CoreError::UnexpectedStop {
                        task: task.task_id().to_string(),
                        target: TaskStatus::running(),
                        reason: snap
                            .stopped_reason
                            .unwrap_or_else(|| "no reason reported".to_string()),
                    });
                }

                match snap.eni_id().filter(|_| snap.has_network_interface()) {
                    None => debug!("network interface not attached yet"),
                    Some(eni) => {
                        let ip = poll
                            .retry
                            .run("describe-network-interfaces", cancel, || network.public_ip(eni))
                            .await?;
                        match ip {
                            Some(ip) => {
                                let addr = ip
                                    .parse::<IpAddr>()
                                    .map_err(|_| CoreError::InvalidAddress(ip.clone()))?;
                                info!(eni, %addr, "public IP resolved");
                                return Ok(addr);
                            }
                            None => debug!(eni, "interface has no public association yet"),
                        }
                    }
                }

                sleep_or_cancel(poll.interval, cancel).await?;
            }
        })
        .await
    }
}
