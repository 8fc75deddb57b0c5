//! Runtime configuration
//!
//! Settings come from an optional TOML file, then environment variables:
//!
//! ```toml
//! quote_base_url = "https://api.iextrading.com/1.0"
//! treasury_base_url = "https://data.nasdaq.com"
//! treasury_api_key = "..."
//! request_timeout_secs = 10
//! log_level = "info"
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{GreeksError, GreeksResult};

pub const ENV_QUOTE_URL: &str = "BS_GREEKS_QUOTE_URL";
pub const ENV_TREASURY_URL: &str = "BS_GREEKS_TREASURY_URL";
pub const ENV_TREASURY_API_KEY: &str = "BS_GREEKS_TREASURY_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "BS_GREEKS_TIMEOUT_SECS";
pub const ENV_LOG: &str = "BS_GREEKS_LOG";

/// Market data endpoints and process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quote service root, `/stock/{symbol}/quote` is appended
    pub quote_base_url: String,
    /// Treasury dataset host
    pub treasury_base_url: String,
    /// API key for the treasury dataset
    pub treasury_api_key: Option<String>,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_base_url: "https://api.iextrading.com/1.0".to_string(),
            treasury_base_url: "https://data.nasdaq.com".to_string(),
            treasury_api_key: None,
            request_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> GreeksResult<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.with_overrides(|key| env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> GreeksResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> GreeksResult<Self> {
        toml::from_str(raw).map_err(|e| GreeksError::config(format!("failed to parse config: {}", e)))
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn with_overrides<F>(mut self, lookup: F) -> GreeksResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_QUOTE_URL) {
            self.quote_base_url = url;
        }
        if let Some(url) = lookup(ENV_TREASURY_URL) {
            self.treasury_base_url = url;
        }
        if let Some(key) = lookup(ENV_TREASURY_API_KEY) {
            self.treasury_api_key = Some(key);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs.trim().parse().map_err(|_| {
                GreeksError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
