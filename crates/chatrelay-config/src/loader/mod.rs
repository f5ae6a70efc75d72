//! Reading and writing the relay config file.
//!
//! Files are parsed as JSON5 (plain JSON is accepted), checked against the
//! schema, then decoded. Saving always writes pretty-printed JSON.

mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, RelayConfig};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.json";

impl RelayConfig {
    /// Load a config from a file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, &path.display().to_string())
    }

    /// Load a config from raw JSON/JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Write the config as pretty JSON, replacing the file atomically.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;
        let temp_path = temp_path(path);
        fs::write(&temp_path, data).map_err(|source| ConfigError::WriteFailed {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, path).map_err(|source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved config (path={})", path.display());
        Ok(())
    }
}

fn config_from_value(value: Value, label: &str) -> Result<RelayConfig, ConfigError> {
    schema::validate_schema(&value, label)?;
    let mut config: RelayConfig = serde_json::from_value(value)?;
    config.rebuild_group_whitelist();
    Ok(config)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
