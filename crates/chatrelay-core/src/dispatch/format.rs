//! Reply formatting and exchange logging.

use crate::message::InboundMessage;
use chatrelay_context::{MessageRecord, Stamp};
use chrono::DateTime;

/// Suffix of the system notification sent when someone "pats" the bot.
pub const PAT_SUFFIX: &str = "拍了拍我";
/// Canned answer to a pat.
pub const PAT_REPLY: &str = "I'm a bot. Patting won't help, but I'm happy to answer a question.";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trim the completion body and mention the member when replying in a group.
pub(super) fn mention_reply(msg: &InboundMessage, body: &str) -> String {
    let content = body.trim();
    match (&msg.group, &msg.sender) {
        (Some(_), Some(member)) => format!("@{} {}", member.nick_name, content),
        _ => content.to_string(),
    }
}

/// Reply to a pat notification such as `"alice" 拍了拍我`, if `content` is one.
pub(super) fn pat_reply(content: &str) -> Option<String> {
    if !content.ends_with(PAT_SUFFIX) {
        return None;
    }
    let reply = match content.split('"').nth(1) {
        Some(name) if !name.is_empty() => format!("@{name} {PAT_REPLY}"),
        _ => PAT_REPLY.to_string(),
    };
    Some(reply)
}

/// Multi-line summary of one exchange and the stored history after it.
pub(super) fn exchange_log(
    key: &str,
    request: &str,
    response: &str,
    history: &[MessageRecord],
) -> String {
    let mut out = format!("\nsenderName:{key}\nreq:{request}\nrsp:{response}\ncontexts:\n");
    for record in history {
        out.push_str(&format!(
            "\t-time:\t{}\t-role:\t{}\t-content:\t{}\n",
            format_stamp(record.stamp()),
            record.role,
            record.content
        ));
    }
    out
}

fn format_stamp(stamp: Stamp) -> String {
    match stamp {
        Stamp::At(secs) => i64::try_from(secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|time| time.format(TIME_FORMAT).to_string())
            .unwrap_or_else(|| secs.to_string()),
        Stamp::Never => "never".to_string(),
        Stamp::Pending => "pending".to_string(),
    }
}
