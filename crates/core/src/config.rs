//! Environment-variable helpers shared by every configuration struct.
//!
//! Each `from_env` constructor has a `from_lookup` twin that takes the
//! variable source as a closure, so parsing can be tested without touching
//! the process environment.

use std::str::FromStr;

use crate::staging::{StagingPolicy, DEFAULT_MAX_FILE_BYTES};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Read `var`, falling back to `default` when it is unset or blank.
pub fn var_or(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: &str) -> String {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read a variable that has no default.
pub fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Parse `var` into `T`, using `default` when unset.
pub fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var).map(|v| v.trim().to_string()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

/// Split a comma-separated variable into trimmed, non-empty items.
pub fn list(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<Vec<String>> {
    let items: Vec<String> = lookup(var)?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Process-environment lookup used by every `from_env`.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

impl StagingPolicy {
    /// Load the staging policy from the environment.
    ///
    /// | Env Var                 | Default     |
    /// |-------------------------|-------------|
    /// | `MEDIA_MAX_FILE_BYTES`  | `5000000` (`0` disables the limit) |
    /// | `MEDIA_ACCEPTED_TYPES`  | unset (any content type) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max: u64 = parse_or(&lookup, "MEDIA_MAX_FILE_BYTES", DEFAULT_MAX_FILE_BYTES)?;
        let accepted = list(&lookup, "MEDIA_ACCEPTED_TYPES")
            .map(|types| types.into_iter().map(|t| t.to_ascii_lowercase()).collect());
        Ok(Self {
            max_file_bytes: (max > 0).then_some(max),
            accepted_content_types: accepted,
        })
    }
}
