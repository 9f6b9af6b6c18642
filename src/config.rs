//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_SESSION_FILE: &str = ".servicehub/session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid { key: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SERVICEHUB_BASE_URL`: API base address, default `http://127.0.0.1:5000`
    /// - `SERVICEHUB_TIMEOUT_MS`: per-request timeout, default 1000
    /// - `SERVICEHUB_SESSION_FILE`: persisted session path
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup("SERVICEHUB_BASE_URL") {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let timeout = match lookup("SERVICEHUB_TIMEOUT_MS") {
            Some(raw) => parse_timeout_ms(&raw)?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };
        let session_file = lookup("SERVICEHUB_SESSION_FILE")
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self { base_url, timeout, session_file })
    }
}

/// Trim trailing slashes and require an http(s) scheme.
///
/// # Errors
///
/// Returns an error for an empty or scheme-less URL.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "SERVICEHUB_BASE_URL",
            value: raw.to_owned(),
            reason: "expected http:// or https:// URL",
        });
    }
    Ok(trimmed.to_owned())
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, ConfigError> {
    let ms = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
        key: "SERVICEHUB_TIMEOUT_MS",
        value: raw.to_owned(),
        reason: "expected milliseconds",
    })?;
    timeout_from_millis(ms)
}

/// Request timeout from a millisecond count; zero is rejected.
///
/// # Errors
///
/// Returns an error when `ms` is 0.
pub fn timeout_from_millis(ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key: "SERVICEHUB_TIMEOUT_MS",
            value: ms.to_string(),
            reason: "must be > 0",
        });
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
