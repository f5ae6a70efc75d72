//! Error types for the dispatch crate.

use crate::completion::CompletionError;
use chatrelay_config::ConfigError;
use thiserror::Error;

/// Errors returned while handling an inbound message.
#[derive(Debug, Error)]
pub enum RelayCoreError {
    /// The completion API call failed.
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),
    /// Reading or persisting config failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// The message kind has no handler.
    #[error("unsupported message kind: {0}")]
    UnsupportedMessage(u32),
    /// Messaging transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}
