//! Application configuration.

use crate::consts::dashboard_consts::{DEFAULT_API_URL, DEFAULT_HUB_URL, hub};
use crate::hub::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::Path, path::PathBuf};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";
/// Environment variable overriding the hub URL
pub const HUB_URL_ENV: &str = "DASHBOARD_HUB_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the indicator API
    pub api_url: String,
    /// URL of the live update hub
    pub hub_url: String,
    /// Delay between hub connection attempts, in milliseconds
    pub reconnect_interval_ms: u64,
    /// Give up after this many consecutive failed attempts; retry forever when unset
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            hub_url: DEFAULT_HUB_URL.to_string(),
            reconnect_interval_ms: hub::RECONNECT_INTERVAL_MS,
            max_reconnect_attempts: None,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration file if there is one, falling back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file, if present.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Applies URL overrides, e.g. from the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, hub_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = api_url;
        }
        if let Some(hub_url) = hub_url.filter(|url| !url.trim().is_empty()) {
            self.hub_url = hub_url;
        }
        self
    }

    /// Applies `DASHBOARD_API_URL` and `DASHBOARD_HUB_URL`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(HUB_URL_ENV).ok(),
        )
    }

    /// Reconnect policy; intervals below the minimum are raised to it.
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        let interval_ms = self
            .reconnect_interval_ms
            .max(hub::MIN_RECONNECT_INTERVAL_MS);
        ReconnectPolicy::new(
            Duration::from_millis(interval_ms),
            self.max_reconnect_attempts,
        )
    }
}

/// Location of the configuration file: `~/.indicator-dashboard/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Failed to get home directory",
        )
    })?;
    Ok(home_path.join(".indicator-dashboard").join("config.json"))
}
