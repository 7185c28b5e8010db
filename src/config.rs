//! Client configuration parsed from environment-style variables.
//!
//! `resolve_api_base_url` and `ClientConfig::from_vars` take an explicit map
//! so they stay pure; `ClientConfig::from_env` snapshots the process
//! environment into that map.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE_URL_VAR: &str = "VITE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "/api/v1";
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 35;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("cannot locate a home directory for the token file; set NETCONSOLE_TOKEN_FILE")]
    NoHomeDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL as configured; may be relative (`/api/v1`).
    pub api_base_url: String,
    /// Origin a relative base URL is joined onto.
    pub origin: String,
    pub timeouts: Timeouts,
    pub token_file: PathBuf,
}

/// Resolve the API base URL from environment-style variables.
///
/// An unset or empty `VITE_API_BASE_URL` falls back to `/api/v1`.
#[must_use]
pub fn resolve_api_base_url(vars: &HashMap<String, String>) -> String {
    vars.get(API_BASE_URL_VAR)
        .filter(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Recognized variables:
    /// - `VITE_API_BASE_URL`: default `/api/v1`
    /// - `NETCONSOLE_ORIGIN`: default `http://127.0.0.1:8000`
    /// - `NETCONSOLE_TIMEOUT_SECS`: default 35
    /// - `NETCONSOLE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `NETCONSOLE_TOKEN_FILE`: default `~/.netconsole/token.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or no token file
    /// location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars = std::env::vars().collect::<HashMap<_, _>>();
        Self::from_vars(&vars)
    }

    /// Build config from an explicit variable map.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or no token file
    /// location can be determined.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_base_url = resolve_api_base_url(vars);
        let origin = vars
            .get("NETCONSOLE_ORIGIN")
            .filter(|value| !value.is_empty())
            .map_or(DEFAULT_ORIGIN, String::as_str)
            .trim_end_matches('/')
            .to_owned();
        let timeouts = Timeouts {
            request_secs: parse_u64(vars, "NETCONSOLE_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(vars, "NETCONSOLE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let token_file = match vars.get("NETCONSOLE_TOKEN_FILE").filter(|value| !value.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_token_file()?,
        };

        Ok(Self { api_base_url, origin, timeouts, token_file })
    }

    /// Absolute base URL requests are issued against.
    ///
    /// Absolute configured URLs are used as-is; relative ones are joined onto
    /// `origin`.
    #[must_use]
    pub fn effective_base_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.to_owned();
        }
        if base.starts_with('/') {
            format!("{}{base}", self.origin)
        } else {
            format!("{}/{base}", self.origin)
        }
    }
}

fn parse_u64(vars: &HashMap<String, String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    match vars.get(key).map(|value| value.trim()).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::Parse(format!("{key} must be a non-negative integer, got '{raw}'"))),
    }
}

fn default_token_file() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".netconsole").join("token.json"))
}
