//! Process configuration for the daemon.
//!
//! Everything user-tunable about the analysis itself (provider, model,
//! options) lives in the persisted settings store instead; this module only
//! covers where the daemon listens and where it keeps its files. The
//! `Config::from_env` method loads with sensible development defaults.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable names. Keeping them public lets tests refer to them.
pub const ENV_BIND_ADDR: &str = "BAITCHECK_BIND_ADDR";
pub const ENV_DATA_DIR: &str = "BAITCHECK_DATA_DIR";
pub const ENV_NOTIFY_WEBHOOK: &str = "BAITCHECK_NOTIFY_WEBHOOK";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8646";
const DEFAULT_DATA_DIR: &str = "./baitcheck-data";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    data_dir: PathBuf,
    notify_webhook: Option<String>,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(bind_addr: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            data_dir: data_dir.into(),
            notify_webhook: None,
        }
    }

    /// Load from environment variables, falling back to development defaults.
    ///
    /// This never fails today because we only do simple string extraction.
    /// In the future, validation (e.g. parse the bind address) can cause it
    /// to return a `ConfigError`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let data_dir = env::var(ENV_DATA_DIR).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let notify_webhook = env::var(ENV_NOTIFY_WEBHOOK).ok();
        Ok(Self {
            bind_addr,
            data_dir: PathBuf::from(data_dir),
            notify_webhook,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Directory holding the settings store and the analyzed-link cache.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Optional webhook that receives link-analysis notifications.
    pub fn notify_webhook(&self) -> Option<&str> {
        self.notify_webhook.as_deref()
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reserved for future validation failures.
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
