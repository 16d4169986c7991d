use std::{fmt, time::Duration};

use jt_model::{ModelError, TaskStatus};
use thiserror::Error;

/// How a failed provider call should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Throttling, timeouts, 5xx: worth retrying with backoff.
    Transient,
    /// The addressed resource does not exist (yet).
    NotFound,
    /// Anything else: retrying will not help.
    Permanent,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorClass::Transient => "transient",
            ErrorClass::NotFound => "not found",
            ErrorClass::Permanent => "permanent",
        })
    }
}

/// A failed call into the cloud provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{op} failed ({class}): {message}")]
pub struct PlatformError {
    pub op: &'static str,
    pub class: ErrorClass,
    pub message: String,
}

impl PlatformError {
    pub fn new(op: &'static str, class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            op,
            class,
            message: message.into(),
        }
    }

    pub fn transient(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorClass::Transient, message)
    }

    pub fn not_found(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorClass::NotFound, message)
    }

    pub fn permanent(op: &'static str, message: impl Into<String>) -> Self {
        Self::new(op, ErrorClass::Permanent, message)
    }

    pub fn is_transient(&self) -> bool {
        self.class == ErrorClass::Transient
    }

    pub fn is_not_found(&self) -> bool {
        self.class == ErrorClass::NotFound
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{op} still failing after {attempts} attempts: {last}")]
    RetriesExhausted {
        op: &'static str,
        attempts: u32,
        last: PlatformError,
    },

    #[error("no {resource} tagged Name={tag}")]
    NoMatch { resource: &'static str, tag: String },

    #[error("launch rejected: {0}")]
    LaunchRejected(String),

    #[error("task {0} missing from describe response")]
    MissingTask(String),

    #[error("task {task} stopped while waiting for {target}: {reason}")]
    UnexpectedStop {
        task: String,
        target: TaskStatus,
        reason: String,
    },

    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },

    #[error("invalid public IP '{0}'")]
    InvalidAddress(String),

    #[error("log tailer ended: {0}")]
    TailerEnded(String),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CoreError {
    /// The provider error at the root of this failure, if any.
    pub fn platform(&self) -> Option<&PlatformError> {
        match self {
            CoreError::Platform(e) => Some(e),
            CoreError::RetriesExhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}
