use chatrelay_config::{ConfigHandle, DEFAULT_CONFIG_FILE};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Write `contents` to a config file in a fresh temp dir and open a handle on it.
///
/// Keep the returned `TempDir` alive for as long as the handle is used.
pub fn temp_config(contents: &str) -> (TempDir, Arc<ConfigHandle>) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, contents).expect("write config");
    let handle = ConfigHandle::open(&path).expect("open config");
    (dir, Arc::new(handle))
}
