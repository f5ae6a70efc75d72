//! Configuration model, validation and persistence for the chat relay.
//!
//! The bot reads one JSON file at startup. `ConfigHandle` keeps the active
//! snapshot and supports reloading and persisted edits at runtime.

mod error;
mod handle;
mod loader;
mod model;

/// Public error type returned by config loading, validation and saving.
pub use error::ConfigError;
/// Live config handle.
pub use handle::ConfigHandle;
/// Default config filename.
pub use loader::DEFAULT_CONFIG_FILE;
/// Configuration schema models.
pub use model::*;
