//! Schema validation for the relay config.
//!
//! The config is flat apart from the `completion` block, so the schema is a
//! table of field names and expected kinds checked in one pass.

use crate::ConfigError;
use serde_json::Value;

#[derive(Clone, Copy)]
enum Kind {
    Text,
    TextList,
    Count,
    Number,
    Block(&'static [(&'static str, Kind)]),
}

const COMPLETION_FIELDS: &[(&str, Kind)] = &[
    ("base_url", Kind::Text),
    ("model", Kind::Text),
    ("temperature", Kind::Number),
    ("top_p", Kind::Number),
    ("frequency_penalty", Kind::Number),
    ("presence_penalty", Kind::Number),
];

const ROOT_FIELDS: &[(&str, Kind)] = &[
    ("token", Kind::Text),
    ("group_chat_prefix", Kind::TextList),
    ("group_name_white_list", Kind::TextList),
    ("conversation_max_tokens", Kind::Count),
    ("character_desc", Kind::Text),
    ("conversation_timeout", Kind::Count),
    ("completion", Kind::Block(COMPLETION_FIELDS)),
];

/// Validate a parsed config document. Errors name the offending field as
/// `<label>:<path>`.
pub(super) fn validate_schema(value: &Value, label: &str) -> Result<(), ConfigError> {
    check(value, Kind::Block(ROOT_FIELDS), "")
        .map_err(|(path, message)| ConfigError::InvalidField {
            path: format!("{label}:{}", if path.is_empty() { "root" } else { path.as_str() }),
            message: message.to_string(),
        })
}

fn check(value: &Value, kind: Kind, path: &str) -> Result<(), (String, &'static str)> {
    let fail = |message| Err((path.to_string(), message));
    match kind {
        Kind::Text if value.is_string() => Ok(()),
        Kind::Text => fail("expected string"),
        Kind::Count if value.is_u64() => Ok(()),
        Kind::Count => fail("expected non-negative integer"),
        Kind::Number if value.is_number() => Ok(()),
        Kind::Number => fail("expected number"),
        Kind::TextList => {
            let Some(entries) = value.as_array() else {
                return fail("expected array");
            };
            match entries.iter().position(|entry| !entry.is_string()) {
                Some(idx) => Err((format!("{path}[{idx}]"), "expected string")),
                None => Ok(()),
            }
        }
        Kind::Block(fields) => {
            let Some(map) = value.as_object() else {
                return fail("expected object");
            };
            for (key, entry) in map {
                let field_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match fields.iter().find(|(name, _)| *name == key.as_str()) {
                    Some((_, kind)) => check(entry, *kind, &field_path)?,
                    None => return Err((field_path, "unknown key")),
                }
            }
            Ok(())
        }
    }
}
