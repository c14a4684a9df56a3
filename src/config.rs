//! Configuration Module
//!
//! Resolves the backend address and local directories.

use std::path::PathBuf;
use std::time::Duration;

/// Backend address used when no override is set.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable overriding the backend address.
pub const API_URL_ENV: &str = "SMART_LEDGER_API_URL";

/// Environment variable holding log filter directives (`RUST_LOG` syntax).
pub const LOG_FILTER_ENV: &str = "SMART_LEDGER_LOG";

#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER: &str = "smart_ledger_lib=debug,info,hyper=warn,reqwest=warn";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,reqwest=warn";

const APP_DIR_NAME: &str = "SmartLedger";

/// Runtime configuration for the client
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base address without trailing slashes
    pub base_url: String,
    pub request_timeout: Duration,
    /// Root for persisted state and log files
    pub data_dir: PathBuf,
    /// Filter directives for the log subscriber
    pub log_filter: String,
}

impl AppConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        let base_url = env_value(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut config = Self::with_base_url(&base_url);
        if let Some(filter) = env_value(LOG_FILTER_ENV) {
            config.log_filter = filter;
        }
        config
    }

    /// Configuration pointing at an explicit backend address
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            request_timeout: Duration::from_secs(30),
            data_dir: default_data_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// Replace the data directory (storage and logs live below it)
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
