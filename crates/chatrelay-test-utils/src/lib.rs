//! Test helpers shared across chatrelay crates.

pub mod completion;
pub mod config;
pub mod messages;

pub use completion::{FailingCompletion, FixedCompletion, RecordingCompletion};
pub use config::temp_config;
pub use messages::{direct_text, group_text, system_text};
