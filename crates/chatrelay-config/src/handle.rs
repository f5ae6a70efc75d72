//! Live, reloadable view of the config file.

use crate::{ConfigError, RelayConfig};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Owns the config file path and the currently active config snapshot.
#[derive(Debug)]
pub struct ConfigHandle {
    path: PathBuf,
    current: RwLock<Arc<RelayConfig>>,
    /// Serializes `update` calls so edits are never lost.
    writer: Mutex<()>,
}

impl ConfigHandle {
    /// Load the config at `path` and wrap it in a handle.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config = RelayConfig::load_from_path(&path)?;
        Ok(Self::from_config(path, config))
    }

    /// Wrap an already built config; nothing is read from disk.
    pub fn from_config(path: impl AsRef<Path>, config: RelayConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            current: RwLock::new(Arc::new(config)),
            writer: Mutex::new(()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the active config.
    pub fn current(&self) -> Arc<RelayConfig> {
        self.current.read().clone()
    }

    /// Re-read the file. On failure the previous config stays active.
    pub fn reload(&self) -> Result<Arc<RelayConfig>, ConfigError> {
        let config = match RelayConfig::load_from_path(&self.path) {
            Ok(config) => Arc::new(config),
            Err(err) => {
                warn!(
                    "config reload failed (path={}, err={})",
                    self.path.display(),
                    err
                );
                return Err(err);
            }
        };
        *self.current.write() = config.clone();
        info!("config reloaded (path={})", self.path.display());
        Ok(config)
    }

    /// Apply `edit` to a copy of the active config, persist it, then activate it.
    ///
    /// Nothing changes when saving fails. Readers keep seeing the previous
    /// snapshot while the file is written; the swap happens after the save.
    pub fn update<R>(&self, edit: impl FnOnce(&mut RelayConfig) -> R) -> Result<R, ConfigError> {
        let _writer = self.writer.lock();
        let mut next = RelayConfig::clone(&self.current());
        let result = edit(&mut next);
        next.save_to_path(&self.path)?;
        *self.current.write() = Arc::new(next);
        Ok(result)
    }
}
