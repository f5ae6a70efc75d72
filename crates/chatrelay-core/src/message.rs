//! Inbound chat messages as delivered by a messaging transport.

/// Kind of an inbound message, using the messaging client's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Plain text (code 1).
    Text,
    /// System notification such as a "pat" (code 10000).
    System,
    /// Client status sync (code 51); carries nothing to answer.
    StatusNotify,
    /// Anything else.
    Other(u32),
}

impl MessageKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => MessageKind::Text,
            10000 => MessageKind::System,
            51 => MessageKind::StatusNotify,
            other => MessageKind::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            MessageKind::Text => 1,
            MessageKind::System => 10000,
            MessageKind::StatusNotify => 51,
            MessageKind::Other(code) => *code,
        }
    }
}

/// A resolved chat user or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub nick_name: String,
    pub uin: u64,
}

impl Contact {
    pub fn new(nick_name: impl Into<String>, uin: u64) -> Self {
        Self {
            nick_name: nick_name.into(),
            uin,
        }
    }
}

/// A message received from the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub kind: MessageKind,
    pub content: String,
    /// Raw transport address of the origin, used when the sender cannot be resolved.
    pub from_user_name: String,
    /// The person who wrote the message; for group messages, the member.
    pub sender: Option<Contact>,
    /// Set when the message was posted in a group.
    pub group: Option<Contact>,
}

impl InboundMessage {
    /// Text message sent directly to the bot.
    pub fn direct(sender: Contact, content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            content: content.into(),
            from_user_name: format!("@{}", sender.nick_name),
            sender: Some(sender),
            group: None,
        }
    }

    /// Text message posted by `member` in `group`.
    pub fn in_group(group: Contact, member: Contact, content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            content: content.into(),
            from_user_name: format!("@@{}", group.nick_name),
            sender: Some(member),
            group: Some(group),
        }
    }

    /// Change the message kind.
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_from_group(&self) -> bool {
        self.group.is_some()
    }

    /// Stable conversation key for the author of this message.
    ///
    /// Group members get their own key, distinct from their direct-chat key.
    pub fn participant_key(&self) -> String {
        let scope = if self.is_from_group() {
            "Group"
        } else {
            "Person"
        };
        match &self.sender {
            Some(sender) => format!("{scope}:{}({})", sender.nick_name, sender.uin),
            None => self.from_user_name.clone(),
        }
    }
}
