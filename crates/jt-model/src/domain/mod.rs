mod kv;
pub use kv::KeyValue;

mod task_env;
pub use task_env::TaskEnv;

mod task_arn;
pub use task_arn::TaskArn;

mod task_status;
pub use task_status::TaskStatus;

mod snapshot;
pub use snapshot::{Attachment, ContainerInfo, TaskSnapshot};

mod launch;
pub use launch::{LaunchSpec, LaunchType, NetworkResources};

mod log;
pub use log::{LogPage, LogQuery, LogStream};

/// Attachment type the platform uses for the task's elastic network interface.
pub const ENI_ATTACHMENT_TYPE: &str = "ElasticNetworkInterface";

/// Attachment detail carrying the interface id.
pub const ENI_ID_DETAIL: &str = "networkInterfaceId";

/// Container environment key carrying the hub auto-patch mode.
pub const HUB_PATCH_ENV: &str = "HUB_PATCH";
