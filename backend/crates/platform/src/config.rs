//! Environment configuration helpers

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(String),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: String, value: String },
}

/// Non-empty, trimmed environment value
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_env(key: &str) -> Result<String, ConfigError> {
    env_string(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Parse an optional environment value, falling back to `default` when unset.
/// A set but unparseable value is an error rather than a silent default.
pub fn env_parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env_string(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}
