use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid task ARN '{arn}': {reason}")]
    InvalidArn { arn: String, reason: &'static str },

    #[error("invalid environment entry '{0}' (expected KEY=VALUE)")]
    InvalidEnvEntry(String),
}
