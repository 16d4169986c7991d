use aws_config::{BehaviorVersion, Region};
use tracing::debug;

/// SDK clients sharing one loaded configuration.
///
/// Implements every platform trait, so a single instance backs a whole
/// [`jt_core::Platform`] via [`jt_core::Platform::from_shared`].
#[derive(Clone, Debug)]
pub struct AwsPlatform {
    pub(crate) ec2: aws_sdk_ec2::Client,
    pub(crate) ecs: aws_sdk_ecs::Client,
    pub(crate) logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsPlatform {
    /// Loads credentials from the default provider chain, pinned to `region`
    /// and optionally to a named profile.
    pub async fn load(region: impl Into<String>, profile: Option<&str>) -> Self {
        let region = region.into();
        debug!(%region, profile, "loading AWS configuration");

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        Self {
            ec2: aws_sdk_ec2::Client::new(&config),
            ecs: aws_sdk_ecs::Client::new(&config),
            logs: aws_sdk_cloudwatchlogs::Client::new(&config),
        }
    }
}
