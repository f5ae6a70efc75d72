//! Console transport: one stdin line per inbound message.
//!
//! Line syntax:
//! - `text` is a direct message from the configured sender
//! - `group|member: text` is a message from `member` in `group`
//! - `!sys text` is a system notification

use chatrelay_core::{Contact, InboundMessage, MessageKind, RelayCoreError};
use std::collections::HashMap;
use tokio::io::{AsyncWrite, AsyncWriteExt};

const SYSTEM_PREFIX: &str = "!sys ";

/// Turns console lines into inbound messages.
///
/// Every distinct name gets a stable numeric id, standing in for the uin a
/// chat network would assign.
#[derive(Debug)]
pub struct ConsoleTransport {
    sender: String,
    ids: HashMap<String, u64>,
}

impl ConsoleTransport {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ids: HashMap::new(),
        }
    }

    /// Parse one line; blank lines yield `None`.
    pub fn parse_line(&mut self, line: &str) -> Option<InboundMessage> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        if let Some(content) = line.strip_prefix(SYSTEM_PREFIX) {
            let sender = self.sender_contact();
            return Some(InboundMessage::direct(sender, content).with_kind(MessageKind::System));
        }
        if let Some((group, member, content)) = split_group_line(line) {
            let group = self.contact(group);
            let member = self.contact(member);
            return Some(InboundMessage::in_group(group, member, content));
        }
        let sender = self.sender_contact();
        Some(InboundMessage::direct(sender, line))
    }

    fn sender_contact(&mut self) -> Contact {
        let name = self.sender.clone();
        self.contact(&name)
    }

    fn contact(&mut self, name: &str) -> Contact {
        let next = self.ids.len() as u64 + 1;
        let uin = *self.ids.entry(name.to_string()).or_insert(next);
        Contact::new(name, uin)
    }
}

/// Write one reply line, tagged with the participant key it answers.
pub async fn write_reply<W>(out: &mut W, key: &str, reply: &str) -> Result<(), RelayCoreError>
where
    W: AsyncWrite + Unpin,
{
    let line = format!("[{key}] {reply}\n");
    out.write_all(line.as_bytes())
        .await
        .map_err(|err| RelayCoreError::Transport(err.to_string()))?;
    out.flush()
        .await
        .map_err(|err| RelayCoreError::Transport(err.to_string()))
}

fn split_group_line(line: &str) -> Option<(&str, &str, &str)> {
    let (group, rest) = line.split_once('|')?;
    let (member, content) = rest.split_once(':')?;
    let (group, member) = (group.trim(), member.trim());
    if group.is_empty() || member.is_empty() {
        return None;
    }
    Some((group, member, content.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::{ConsoleTransport, write_reply};
    use chatrelay_core::MessageKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_lines_are_direct_messages() {
        let mut transport = ConsoleTransport::new("alice");
        let msg = transport.parse_line("hello there\n").expect("message");
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.content, "hello there");
        assert_eq!(msg.participant_key(), "Person:alice(1)");
    }

    #[test]
    fn group_lines_carry_group_and_member() {
        let mut transport = ConsoleTransport::new("alice");
        let msg = transport
            .parse_line("friends|bob: @bot what time is it?")
            .expect("message");
        assert!(msg.is_from_group());
        assert_eq!(msg.group.as_ref().map(|g| g.nick_name.as_str()), Some("friends"));
        assert_eq!(msg.content, "@bot what time is it?");
        assert_eq!(msg.participant_key(), "Group:bob(2)");
    }

    #[test]
    fn ids_are_stable_per_name() {
        let mut transport = ConsoleTransport::new("alice");
        transport.parse_line("hi");
        transport.parse_line("friends|bob: hi");
        let again = transport.parse_line("hi again").expect("message");
        assert_eq!(again.participant_key(), "Person:alice(1)");
        let bob = transport.parse_line("friends|bob: again").expect("message");
        assert_eq!(bob.participant_key(), "Group:bob(3)");
    }

    #[test]
    fn system_lines_and_blanks() {
        let mut transport = ConsoleTransport::new("alice");
        let msg = transport.parse_line("!sys \"bob\" 拍了拍我").expect("message");
        assert_eq!(msg.kind, MessageKind::System);
        assert_eq!(msg.content, "\"bob\" 拍了拍我");
        assert!(transport.parse_line("   ").is_none());
    }

    #[test]
    fn pipes_without_member_stay_direct() {
        let mut transport = ConsoleTransport::new("alice");
        let msg = transport.parse_line("a|b without colon").expect("message");
        assert!(!msg.is_from_group());
        let msg = transport.parse_line("|bob: hi").expect("message");
        assert!(!msg.is_from_group());
    }

    #[tokio::test]
    async fn replies_are_tagged_with_key() {
        let mut out = Vec::new();
        write_reply(&mut out, "Person:alice(1)", "pong")
            .await
            .expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), "[Person:alice(1)] pong\n");
    }
}
