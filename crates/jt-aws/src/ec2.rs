use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use jt_core::{NetworkApi, PlatformError};
use tracing::trace;

use crate::{AwsPlatform, classify::classify};

fn name_tag(tag: &str) -> Filter {
    Filter::builder().name("tag:Name").values(tag).build()
}

#[async_trait]
impl NetworkApi for AwsPlatform {
    async fn subnets_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError> {
        let out = self
            .ec2
            .describe_subnets()
            .filters(name_tag(tag))
            .send()
            .await
            .map_err(|e| classify("describe-subnets", e))?;

        Ok(out
            .subnets()
            .iter()
            .filter_map(|s| s.subnet_id().map(str::to_owned))
            .collect())
    }

    async fn security_groups_by_tag(&self, tag: &str) -> Result<Vec<String>, PlatformError> {
        let out = self
            .ec2
            .describe_security_groups()
            .filters(name_tag(tag))
            .send()
            .await
            .map_err(|e| classify("describe-security-groups", e))?;

        Ok(out
            .security_groups()
            .iter()
            .filter_map(|g| g.group_id().map(str::to_owned))
            .collect())
    }

    async fn public_ip(&self, eni_id: &str) -> Result<Option<String>, PlatformError> {
        let out = match self
            .ec2
            .describe_network_interfaces()
            .network_interface_ids(eni_id)
            .send()
            .await
        {
            Ok(out) => out,
            Err(e) => {
                let err = classify("describe-network-interfaces", e);
                // A freshly attached interface may not be visible to EC2 yet.
                if err.is_not_found() {
                    trace!(eni_id, "interface not visible yet");
                    return Ok(None);
                }
                return Err(err);
            }
        };

        Ok(out
            .network_interfaces()
            .first()
            .and_then(|ni| ni.association())
            .and_then(|a| a.public_ip())
            .map(str::to_owned))
    }
}
