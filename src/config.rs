//! Client configuration parsed from environment variables.
//!
//! Command-line flags in the binary override individual values through
//! [`Overrides`]; everything else comes from the environment (after an
//! optional `.env` file has been loaded).

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const DEFAULT_DOWNLOAD_DIR: &str = ".";

/// Errors produced while building a [`Config`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// HTTP timeouts. No request timeout unless one is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: None, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub download_dir: PathBuf,
    pub timeouts: HttpTimeouts,
    pub log_filter: String,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: Option<String>,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `WAREHOUSE_API_BASE`: default `http://localhost:8080/api`
    /// - `WAREHOUSE_DOWNLOAD_DIR`: where exports are saved, default `.`
    /// - `WAREHOUSE_HTTP_TIMEOUT_SECS`: request timeout, default none
    /// - `WAREHOUSE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `WAREHOUSE_LOG`: tracing filter, default `warn`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a malformed URL or timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a malformed URL or timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            "WAREHOUSE_API_BASE",
            &lookup("WAREHOUSE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
        )?;
        let download_dir =
            PathBuf::from(lookup("WAREHOUSE_DOWNLOAD_DIR").unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.to_owned()));
        let timeouts = HttpTimeouts {
            request_secs: parse_secs("WAREHOUSE_HTTP_TIMEOUT_SECS", lookup("WAREHOUSE_HTTP_TIMEOUT_SECS"))?,
            connect_secs: parse_secs("WAREHOUSE_CONNECT_TIMEOUT_SECS", lookup("WAREHOUSE_CONNECT_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let log_filter = lookup("WAREHOUSE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Self { base_url, download_dir, timeouts, log_filter })
    }

    /// Apply command-line overrides on top of the environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the overriding URL is malformed.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(base_url) = overrides.base_url {
            self.base_url = normalize_base_url("--base-url", &base_url)?;
        }
        if let Some(download_dir) = overrides.download_dir {
            self.download_dir = download_dir;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.timeouts.request_secs = Some(secs);
        }
        if let Some(filter) = overrides.log_filter {
            self.log_filter = filter;
        }
        Ok(self)
    }
}

fn normalize_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::Invalid { var, reason: format!("expected an http(s) URL, got '{raw}'") });
    }
    Ok(trimmed.to_owned())
}

fn parse_secs(var: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid { var, reason: "must be greater than zero".to_owned() }),
        Ok(secs) => Ok(Some(secs)),
        Err(_) => Err(ConfigError::Invalid { var, reason: format!("expected whole seconds, got '{raw}'") }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
