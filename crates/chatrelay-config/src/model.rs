//! Configuration schema for the chat relay bot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Root configuration, stored as a single JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    /// API key for the completion endpoint.
    #[serde(default)]
    pub token: String,
    /// Prefixes that address the bot inside a group chat.
    #[serde(default)]
    pub group_chat_prefix: Vec<String>,
    #[serde(default)]
    group_name_white_list: Vec<String>,
    /// Character budget per conversation; zero selects the built-in default.
    #[serde(default)]
    pub conversation_max_tokens: usize,
    /// Default system prompt seeded into new conversations.
    #[serde(default)]
    pub character_desc: String,
    /// Expiry window in seconds; zero selects the built-in default.
    #[serde(default)]
    pub conversation_timeout: u64,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(skip)]
    group_whitelist: HashSet<String>,
}

impl RelayConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::new()
    }

    /// Allowed group names in insertion order.
    pub fn group_name_white_list(&self) -> &[String] {
        &self.group_name_white_list
    }

    /// Rebuild the whitelist lookup set from the list.
    pub(crate) fn rebuild_group_whitelist(&mut self) {
        self.group_whitelist = self
            .group_name_white_list
            .iter()
            .filter(|name| !name.is_empty())
            .cloned()
            .collect();
    }

    /// Whether messages from `group_name` may be answered. An empty whitelist allows all groups.
    pub fn matches_group_name(&self, group_name: &str) -> bool {
        self.group_whitelist.is_empty() || self.group_whitelist.contains(group_name)
    }

    /// Whether `content` starts with one of the group mention prefixes.
    pub fn matches_group_chat_prefix(&self, content: &str) -> bool {
        self.group_chat_prefix
            .iter()
            .any(|prefix| !prefix.is_empty() && content.starts_with(prefix.as_str()))
    }

    /// Strip the first matching group mention prefix and surrounding whitespace.
    pub fn strip_group_chat_prefix<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.group_chat_prefix
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| content.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }

    /// Add a group to the whitelist, keeping entries unique.
    pub fn add_group_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.group_name_white_list.contains(&name) {
            self.group_name_white_list.push(name);
        }
        self.rebuild_group_whitelist();
    }

    /// Remove a group from the whitelist. Returns false when it was not listed.
    pub fn remove_group_name(&mut self, name: &str) -> bool {
        let Some(idx) = self
            .group_name_white_list
            .iter()
            .position(|entry| entry == name)
        else {
            return false;
        };
        self.group_name_white_list.remove(idx);
        self.rebuild_group_whitelist();
        true
    }

    /// Default system prompt.
    pub fn default_prompt(&self) -> &str {
        &self.character_desc
    }

    /// Replace the default system prompt.
    pub fn set_default_prompt(&mut self, prompt: impl Into<String>) {
        self.character_desc = prompt.into();
    }
}

/// Builder for assembling a `RelayConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RelayConfig::default(),
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    pub fn group_chat_prefix(mut self, prefixes: Vec<String>) -> Self {
        self.config.group_chat_prefix = prefixes;
        self
    }

    pub fn group_name_white_list(mut self, names: Vec<String>) -> Self {
        self.config.group_name_white_list = names;
        self
    }

    pub fn conversation_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.conversation_max_tokens = max_tokens;
        self
    }

    pub fn character_desc(mut self, prompt: impl Into<String>) -> Self {
        self.config.character_desc = prompt.into();
        self
    }

    pub fn conversation_timeout(mut self, secs: u64) -> Self {
        self.config.conversation_timeout = secs;
        self
    }

    pub fn completion(mut self, completion: CompletionConfig) -> Self {
        self.config.completion = completion;
        self
    }

    /// Finalize and return the built `RelayConfig`.
    pub fn build(mut self) -> RelayConfig {
        self.config.rebuild_group_whitelist();
        self.config
    }
}

/// Chat-completion endpoint and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_one")]
    pub top_p: f32,
    #[serde(default = "default_one")]
    pub frequency_penalty: f32,
    #[serde(default = "default_one")]
    pub presence_penalty: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_one(),
            frequency_penalty: default_one(),
            presence_penalty: default_one(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.9
}

fn default_one() -> f32 {
    1.0
}
