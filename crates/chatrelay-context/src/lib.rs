//! Per-participant conversation context for the chat relay.
//!
//! Holds ordered message histories, enforces a character budget by evicting
//! the oldest turn after the system prompt, and hides records older than the
//! configured expiry window from completion requests.

pub mod clock;
pub mod model;
pub mod policy;
pub mod store;

/// Time sources.
pub use clock::{Clock, ManualClock, SystemClock};
/// Record model.
pub use model::{CompletionMessage, MessageRecord, Role, Stamp};
/// Budget and expiry policy.
pub use policy::{ContextPolicy, PolicySource};
/// Conversation store.
pub use store::{AppendOutcome, ContextStore, UNKNOWN_CONTEXT};
