//! Dispatch layer for the chat relay.
//!
//! Turns inbound chat messages into built-in command replies, admin actions,
//! or completion API calls that carry the sender's conversation context.

pub mod command;
pub mod completion;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod policy;

pub use command::{ADMIN_FORMAT_ERROR, AdminCommand, Command, CommandError};
pub use completion::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
pub use dispatch::{MessageHandler, PAT_REPLY, PAT_SUFFIX};
pub use error::RelayCoreError;
pub use message::{Contact, InboundMessage, MessageKind};
pub use policy::ConfigPolicy;
