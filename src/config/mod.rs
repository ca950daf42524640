//! Configuration loading for appshell

pub mod schema;

pub use schema::{CacheConfig, Config, KeepAliveConfig, NotificationConfig};

use crate::error::{AppshellError, AppshellResult};
use std::path::Path;
use tokio::fs;
use tracing::debug;

impl Config {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> AppshellResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file, falling back to defaults if it does
    /// not exist
    pub async fn load(path: &Path) -> AppshellResult<Self> {
        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| AppshellError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| AppshellError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save the configuration to a file
    pub async fn save(&self, path: &Path) -> AppshellResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppshellError::io(format!("creating config directory {}", parent.display()), e)
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .map_err(|e| AppshellError::io(format!("writing config to {}", path.display()), e))
    }
}
