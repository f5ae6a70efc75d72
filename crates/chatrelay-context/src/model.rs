//! Message records stored per conversation participant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker role for a stored message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standing character prompt.
    System,
    /// Turn authored by the chat participant.
    User,
    /// Turn produced by the completion API.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation time of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stamp {
    /// Not yet finalized; filled with the current time on first store.
    Pending,
    /// Seconds since the Unix epoch.
    At(u64),
    /// Exempt from expiry.
    Never,
}

/// A single role-tagged entry in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Speaker role.
    pub role: Role,
    /// Message text.
    pub content: String,
    stamp: Stamp,
}

impl MessageRecord {
    /// Create a record whose timestamp is filled in when it is stored.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            stamp: Stamp::Pending,
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create the standing system prompt, which never expires.
    pub fn system_prompt(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            stamp: Stamp::Never,
        }
    }

    /// Create a record with an explicit creation time.
    ///
    /// A timestamp of `0` means unset: the record stays pending until it is
    /// finalized.
    pub fn at(role: Role, content: impl Into<String>, timestamp: u64) -> Self {
        let stamp = match timestamp {
            0 => Stamp::Pending,
            timestamp => Stamp::At(timestamp),
        };
        Self {
            role,
            content: content.into(),
            stamp,
        }
    }

    /// Current stamp of the record.
    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    /// Creation time in epoch seconds, if one has been assigned.
    pub fn timestamp(&self) -> Option<u64> {
        match self.stamp {
            Stamp::At(timestamp) => Some(timestamp),
            Stamp::Pending | Stamp::Never => None,
        }
    }

    /// Whether the record is exempt from expiry.
    pub fn never_expires(&self) -> bool {
        matches!(self.stamp, Stamp::Never)
    }

    /// Assign `now` as the creation time if none has been assigned yet.
    ///
    /// A stamp that is already set, including the never-expire marker, is
    /// left untouched.
    pub fn finalize(&mut self, now: u64) {
        if self.stamp == Stamp::Pending {
            self.stamp = Stamp::At(now);
        }
    }

    /// True when `timestamp + window < now`.
    ///
    /// Never-expiring records always return false. A pending record is
    /// treated as created at `now`.
    pub fn is_expired(&self, window_secs: u64, now: u64) -> bool {
        match self.stamp {
            Stamp::Never | Stamp::Pending => false,
            Stamp::At(timestamp) => timestamp.saturating_add(window_secs) < now,
        }
    }

    /// Number of characters (not bytes) in the content.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Role and content pair for a completion request.
    pub fn to_completion(&self) -> CompletionMessage {
        CompletionMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Role and content pair submitted to a chat-completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: Role,
    pub content: String,
}
