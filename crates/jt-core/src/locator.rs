use std::sync::Arc;

use jt_model::NetworkResources;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{CoreError, NetworkApi, RetryPolicy};

/// Resolves the subnet and security group a task is placed into, by `Name` tag.
pub struct ResourceLocator {
    network: Arc<dyn NetworkApi>,
    retry: RetryPolicy,
}

impl ResourceLocator {
    pub fn new(network: Arc<dyn NetworkApi>, retry: RetryPolicy) -> Self {
        Self { network, retry }
    }

    /// First subnet and first security group carrying the tag.
    #[instrument(level = "debug", skip(self, cancel))]
    pub async fn locate(
        &self,
        tag: &str,
        cancel: &CancellationToken,
    ) -> Result<NetworkResources, CoreError> {
        let network = &*self.network;

        let subnets = self
            .retry
            .run("describe-subnets", cancel, || network.subnets_by_tag(tag))
            .await?;
        let groups = self
            .retry
            .run("describe-security-groups", cancel, || {
                network.security_groups_by_tag(tag)
            })
            .await?;
        debug!(subnets = subnets.len(), groups = groups.len(), "tag lookup finished");

        let subnet_id = first(subnets, "subnet", tag)?;
        let security_group_id = first(groups, "security group", tag)?;
        Ok(NetworkResources {
            subnet_id,
            security_group_id,
        })
    }
}

fn first(ids: Vec<String>, resource: &'static str, tag: &str) -> Result<String, CoreError> {
    ids.into_iter().next().ok_or_else(|| CoreError::NoMatch {
        resource,
        tag: tag.to_string(),
    })
}
