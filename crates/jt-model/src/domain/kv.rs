use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Single `name=value` pair, as used by container environment overrides
/// and attachment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    key: String,
    value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parses `KEY=VALUE`; the value may itself contain `=`.
impl FromStr for KeyValue {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self::new(key.trim(), value)),
            _ => Err(ModelError::InvalidEnvEntry(s.to_string())),
        }
    }
}
