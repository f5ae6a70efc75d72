//! Tests for config loading and saving.

use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = RelayConfig::load_from_str("{}").expect("config");
    assert_eq!(config.conversation_max_tokens, 0);
    assert_eq!(config.conversation_timeout, 0);
    assert_eq!(config.completion.model, "gpt-3.5-turbo");
    assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
    assert!(config.matches_group_name("any"));
}

/// Plain JSON in the original file layout is accepted.
#[test]
fn parse_full_json_config() {
    let json = r#"{
        "token": "sk-test",
        "group_chat_prefix": ["@bot"],
        "group_name_white_list": ["friends"],
        "conversation_max_tokens": 500,
        "character_desc": "You are helpful.",
        "conversation_timeout": 120
    }"#;
    let config = RelayConfig::load_from_str(json).expect("config");
    assert_eq!(config.token, "sk-test");
    assert_eq!(config.conversation_max_tokens, 500);
    assert_eq!(config.conversation_timeout, 120);
    assert_eq!(config.default_prompt(), "You are helpful.");
    assert!(config.matches_group_name("friends"));
    assert!(!config.matches_group_name("others"));
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = RelayConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
    assert!(msg.contains("unexpected"));
}

/// Reject wrongly typed nested values.
#[test]
fn rejects_invalid_completion_field() {
    let err = RelayConfig::load_from_str(r#"{ completion: { temperature: "hot" } }"#)
        .unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("completion.temperature"));
}

/// Reject negative budgets.
#[test]
fn rejects_negative_budget() {
    let err = RelayConfig::load_from_str(r#"{ conversation_max_tokens: -1 }"#).unwrap_err();
    assert!(format!("{err}").contains("conversation_max_tokens"));
}

/// Reject non-string whitelist entries.
#[test]
fn rejects_non_string_whitelist_entry() {
    let err = RelayConfig::load_from_str(r#"{ group_name_white_list: ["ok", 3] }"#).unwrap_err();
    assert!(format!("{err}").contains("group_name_white_list[1]"));
}

/// Missing files surface as read errors.
#[test]
fn missing_file_is_read_error() {
    let temp = TempDir::new().expect("tmp");
    let err = RelayConfig::load_from_path(temp.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

/// Saved configs load back with the same values and whitelist lookup.
#[test]
fn save_then_load_preserves_values() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    let mut config = RelayConfig::builder()
        .token("sk-test")
        .character_desc("prompt")
        .conversation_max_tokens(42)
        .build();
    config.add_group_name("friends");
    config.save_to_path(&path).expect("save");

    let loaded = RelayConfig::load_from_path(&path).expect("load");
    assert_eq!(loaded.token, "sk-test");
    assert_eq!(loaded.conversation_max_tokens, 42);
    assert_eq!(loaded.group_name_white_list(), &["friends".to_string()]);
    assert!(!loaded.matches_group_name("others"));
    assert!(!temp.path().join("chatrelay.json.tmp").exists());
}
