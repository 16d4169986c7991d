//! Launcher settings: JSON file, command line, defaults.
//!
//! Every field is optional in both sources. Command-line values win over the
//! file, the file wins over the built-in defaults.
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use jt_core::{PollConfig, SessionConfig, TailerConfig};
use jt_model::{HUB_PATCH_ENV, TaskEnv};
use jt_observe::{LoggerConfig, LoggerError, LoggerFormat, LoggerLevel};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_HUB_PATCH: u8 = 2;
const MAX_HUB_PATCH: u8 = 4;
const MAX_PAGE_SIZE: u32 = 10_000;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("page size must be between 1 and 10000, got {0}")]
    PageSize(u32),

    #[error("hubpatch must be between 0 and 4, got {0}")]
    HubPatch(u8),

    #[error("HUB_PATCH is set through hubpatch, not env")]
    ReservedEnv,

    #[error(transparent)]
    Logger(#[from] LoggerError),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub hubpatch: Option<u8>,
    pub env: TaskEnv,

    pub cluster: Option<String>,
    pub task_definition: Option<String>,
    pub container: Option<String>,
    pub log_group: Option<String>,
    pub log_stream_prefix: Option<String>,
    pub tag: Option<String>,

    pub poll_interval_ms: Option<u64>,
    /// `0` disables the deadline.
    pub wait_timeout_secs: Option<u64>,
    pub stop_timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
    pub stop_on_error: Option<bool>,

    pub log_level: Option<String>,
    pub log_format: Option<LoggerFormat>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub region: String,
    pub profile: Option<String>,
    pub session: SessionConfig,
    pub logger: LoggerConfig,
}

impl LauncherConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `over` takes precedence; environment entries are concatenated so
    /// later ones override earlier ones.
    pub fn overlay(self, over: LauncherConfig) -> LauncherConfig {
        LauncherConfig {
            region: over.region.or(self.region),
            profile: over.profile.or(self.profile),
            hubpatch: over.hubpatch.or(self.hubpatch),
            env: self.env.merged(&over.env),
            cluster: over.cluster.or(self.cluster),
            task_definition: over.task_definition.or(self.task_definition),
            container: over.container.or(self.container),
            log_group: over.log_group.or(self.log_group),
            log_stream_prefix: over.log_stream_prefix.or(self.log_stream_prefix),
            tag: over.tag.or(self.tag),
            poll_interval_ms: over.poll_interval_ms.or(self.poll_interval_ms),
            wait_timeout_secs: over.wait_timeout_secs.or(self.wait_timeout_secs),
            stop_timeout_secs: over.stop_timeout_secs.or(self.stop_timeout_secs),
            page_size: over.page_size.or(self.page_size),
            stop_on_error: over.stop_on_error.or(self.stop_on_error),
            log_level: over.log_level.or(self.log_level),
            log_format: over.log_format.or(self.log_format),
        }
    }

    /// Checks values that would otherwise only fail once a task is running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("region", &self.region),
            ("cluster", &self.cluster),
            ("task_definition", &self.task_definition),
            ("container", &self.container),
            ("log_group", &self.log_group),
            ("log_stream_prefix", &self.log_stream_prefix),
            ("tag", &self.tag),
        ];
        for (field, value) in names {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::Empty(field));
            }
        }

        if self.poll_interval_ms == Some(0) {
            return Err(ConfigError::ZeroPollInterval);
        }
        if let Some(size) = self.page_size
            && !(1..=MAX_PAGE_SIZE).contains(&size)
        {
            return Err(ConfigError::PageSize(size));
        }
        if let Some(patch) = self.hubpatch
            && patch > MAX_HUB_PATCH
        {
            return Err(ConfigError::HubPatch(patch));
        }
        if self.env.get(HUB_PATCH_ENV).is_some() {
            return Err(ConfigError::ReservedEnv);
        }
        Ok(())
    }

    pub fn resolve(self) -> Result<Settings, ConfigError> {
        self.validate()?;

        let logger = LoggerConfig {
            format: self.log_format.unwrap_or_default(),
            level: LoggerLevel::new(self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?,
            ..LoggerConfig::default()
        };

        let defaults = SessionConfig::default();
        let poll = PollConfig {
            interval: self
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll.interval),
            timeout: match self.wait_timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.poll.timeout,
            },
            ..defaults.poll.clone()
        };
        let tailer = TailerConfig {
            page_size: self.page_size.unwrap_or(defaults.tailer.page_size),
            retry: poll.retry.clone(),
            ..defaults.tailer.clone()
        };

        let mut env = TaskEnv::single(
            HUB_PATCH_ENV,
            self.hubpatch.unwrap_or(DEFAULT_HUB_PATCH).to_string(),
        );
        env = env.merged(&self.env);

        let session = SessionConfig {
            cluster: self.cluster.unwrap_or(defaults.cluster),
            task_definition: self.task_definition.unwrap_or(defaults.task_definition),
            container: self.container.unwrap_or(defaults.container),
            resource_tag: self.tag.unwrap_or(defaults.resource_tag),
            log_group: self.log_group.unwrap_or(defaults.log_group),
            log_stream_prefix: self.log_stream_prefix.unwrap_or(defaults.log_stream_prefix),
            env,
            poll,
            stop_timeout: match self.stop_timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.stop_timeout,
            },
            tailer,
            stop_on_error: self.stop_on_error.unwrap_or(defaults.stop_on_error),
            ..defaults
        };

        Ok(Settings {
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            profile: self.profile,
            session,
            logger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_deployment() {
        let s = LauncherConfig::default().resolve().unwrap();
        assert_eq!(s.region, "us-east-1");
        assert_eq!(s.session.cluster, "jacktrip");
        assert_eq!(s.session.task_definition, "run-jacktrip");
        assert_eq!(s.session.container, "jacktrip");
        assert_eq!(s.session.resource_tag, "jacktrip");
        assert_eq!(s.session.log_group, "/ecs/run-jacktrip");
        assert_eq!(s.session.log_stream_prefix, "ecs");
        assert_eq!(s.session.env.get(HUB_PATCH_ENV), Some("2"));
        assert_eq!(s.session.tailer.page_size, 100);
        assert!(s.session.stop_on_error);
        assert_eq!(s.logger.level.as_str(), "warn");
    }

    #[test]
    fn hubpatch_is_forwarded_as_env() {
        let cfg = LauncherConfig {
            hubpatch: Some(3),
            ..Default::default()
        };
        let s = cfg.resolve().unwrap();
        assert_eq!(s.session.env.get(HUB_PATCH_ENV), Some("3"));
        assert_eq!(s.session.env.resolved().len(), 1);
    }

    #[test]
    fn command_line_wins_over_file() {
        let file: LauncherConfig = serde_json::from_str(
            r#"{
                "cluster": "from-file",
                "container": "hub",
                "poll_interval_ms": 250,
                "env": [{"key": "A", "value": "file"}, {"key": "B", "value": "file"}]
            }"#,
        )
        .unwrap();
        let cli = LauncherConfig {
            cluster: Some("from-cli".into()),
            env: TaskEnv::single("A", "cli"),
            ..Default::default()
        };

        let s = file.overlay(cli).resolve().unwrap();
        assert_eq!(s.session.cluster, "from-cli");
        assert_eq!(s.session.container, "hub");
        assert_eq!(s.session.poll.interval, Duration::from_millis(250));
        assert_eq!(s.session.env.get("A"), Some("cli"));
        assert_eq!(s.session.env.get("B"), Some("file"));
    }

    #[test]
    fn zero_wait_timeout_waits_forever() {
        let cfg = LauncherConfig {
            wait_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.resolve().unwrap().session.poll.timeout, None);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases = [
            LauncherConfig {
                cluster: Some("  ".into()),
                ..Default::default()
            },
            LauncherConfig {
                poll_interval_ms: Some(0),
                ..Default::default()
            },
            LauncherConfig {
                page_size: Some(0),
                ..Default::default()
            },
            LauncherConfig {
                page_size: Some(10_001),
                ..Default::default()
            },
            LauncherConfig {
                hubpatch: Some(5),
                ..Default::default()
            },
            LauncherConfig {
                env: TaskEnv::single(HUB_PATCH_ENV, "1"),
                ..Default::default()
            },
            LauncherConfig {
                log_level: Some("jt_core=loud".into()),
                ..Default::default()
            },
        ];
        for cfg in cases {
            assert!(cfg.clone().resolve().is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(serde_json::from_str::<LauncherConfig>(r#"{"clustr": "x"}"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LauncherConfig::load(Path::new("/nonexistent/jacktrip.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/jacktrip.json"));
    }
}
