use chatrelay_core::{Contact, InboundMessage, MessageKind};

/// Direct text message from `nick` (uin 1).
pub fn direct_text(nick: &str, content: &str) -> InboundMessage {
    InboundMessage::direct(Contact::new(nick, 1), content)
}

/// Group text message from member `nick` (uin 2) in `group` (uin 100).
pub fn group_text(group: &str, nick: &str, content: &str) -> InboundMessage {
    InboundMessage::in_group(Contact::new(group, 100), Contact::new(nick, 2), content)
}

/// System notification delivered in a direct chat.
pub fn system_text(content: &str) -> InboundMessage {
    InboundMessage::direct(Contact::new("system", 0), content).with_kind(MessageKind::System)
}
