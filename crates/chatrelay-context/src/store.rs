//! In-memory conversation store keyed by participant.

use crate::clock::{Clock, SystemClock};
use crate::model::{CompletionMessage, MessageRecord};
use crate::policy::PolicySource;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Rendering returned for a participant that has never been seen.
pub const UNKNOWN_CONTEXT: &str = "null";

/// Result of a single append, reported for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Number of expired records dropped before appending.
    pub expired: usize,
    /// Record evicted to honor the character budget.
    pub evicted: Option<MessageRecord>,
    /// Summed character count after the append and any eviction.
    pub total_chars: usize,
}

/// Conversation histories for every participant, guarded by one lock.
///
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct ContextStore {
    histories: Arc<RwLock<HashMap<String, Vec<MessageRecord>>>>,
    policy: Arc<dyn PolicySource>,
    clock: Arc<dyn Clock>,
}

impl ContextStore {
    /// Create an empty store using the system clock.
    pub fn new(policy: Arc<dyn PolicySource>) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Create an empty store with an explicit clock.
    pub fn with_clock(policy: Arc<dyn PolicySource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            histories: Arc::new(RwLock::new(HashMap::new())),
            policy,
            clock,
        }
    }

    /// Seed `key` with the standing system prompt unless it already has history.
    ///
    /// Returns true when the prompt was inserted. A history emptied by
    /// [`ContextStore::clear`] is seeded again.
    pub fn ensure_default(&self, key: &str, default_prompt: &str) -> bool {
        let mut histories = self.histories.write();
        let history = histories.entry(key.to_string()).or_default();
        if !history.is_empty() {
            return false;
        }
        history.push(MessageRecord::system_prompt(default_prompt));
        debug!(
            "seeded default prompt (key={}, prompt_len={})",
            key,
            default_prompt.chars().count()
        );
        true
    }

    /// Append a record, compacting expired entries and enforcing the budget.
    ///
    /// At most one record is evicted per call: the entry at index 1, so the
    /// leading system prompt and the newest record are both kept.
    pub fn append(&self, key: &str, mut record: MessageRecord) -> AppendOutcome {
        let policy = self.policy.context_policy();
        let now = self.clock.now_secs();
        record.finalize(now);

        let mut histories = self.histories.write();
        let previous = histories.remove(key).unwrap_or_default();
        let before = previous.len();
        let mut history: Vec<MessageRecord> = previous
            .into_iter()
            .filter(|entry| !entry.is_expired(policy.expiry_window_secs, now))
            .collect();
        let expired = before - history.len();
        history.push(record);

        let mut total_chars: usize = history.iter().map(MessageRecord::char_len).sum();
        let mut evicted = None;
        if total_chars > policy.max_tokens && history.len() > 2 {
            let removed = history.remove(1);
            total_chars -= removed.char_len();
            evicted = Some(removed);
        }

        debug!(
            "appended context record (key={}, entries={}, expired={}, evicted={}, total_chars={}, max_tokens={})",
            key,
            history.len(),
            expired,
            evicted.is_some(),
            total_chars,
            policy.max_tokens
        );
        histories.insert(key.to_string(), history);
        AppendOutcome {
            expired,
            evicted,
            total_chars,
        }
    }

    /// Non-expired history for `key` in stored order, ready for a completion call.
    pub fn messages_for_completion(&self, key: &str) -> Vec<CompletionMessage> {
        let policy = self.policy.context_policy();
        let now = self.clock.now_secs();
        let histories = self.histories.read();
        histories
            .get(key)
            .map(|history| {
                history
                    .iter()
                    .filter(|entry| !entry.is_expired(policy.expiry_window_secs, now))
                    .map(MessageRecord::to_completion)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full stored history for `key`, including expired entries.
    pub fn raw(&self, key: &str) -> Vec<MessageRecord> {
        self.histories.read().get(key).cloned().unwrap_or_default()
    }

    /// One `role: content` line per stored record, or `"null"` for an unknown key.
    pub fn display(&self, key: &str) -> String {
        let histories = self.histories.read();
        let Some(history) = histories.get(key) else {
            return UNKNOWN_CONTEXT.to_string();
        };
        let mut rendered = String::new();
        for record in history {
            rendered.push_str(&format!("{}: {}\n", record.role, record.content));
        }
        rendered
    }

    /// Whether `key` has ever been seen since the last [`ContextStore::clear_all`].
    pub fn is_known(&self, key: &str) -> bool {
        self.histories.read().contains_key(key)
    }

    /// Number of known participants.
    pub fn participant_count(&self) -> usize {
        self.histories.read().len()
    }

    /// Reset `key` to an empty but known history.
    pub fn clear(&self, key: &str) {
        self.histories.write().insert(key.to_string(), Vec::new());
        info!("cleared context (key={})", key);
    }

    /// Drop every history.
    pub fn clear_all(&self) {
        let mut histories = self.histories.write();
        let dropped = histories.len();
        *histories = HashMap::new();
        info!("cleared all contexts (participants={})", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextStore, UNKNOWN_CONTEXT};
    use crate::clock::ManualClock;
    use crate::model::{MessageRecord, Role};
    use crate::policy::ContextPolicy;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn store(max_tokens: usize, window: u64) -> (ContextStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let policy = ContextPolicy {
            max_tokens,
            expiry_window_secs: window,
        };
        (
            ContextStore::with_clock(Arc::new(policy), clock.clone()),
            clock,
        )
    }

    fn contents(store: &ContextStore, key: &str) -> Vec<String> {
        store
            .raw(key)
            .into_iter()
            .map(|record| record.content)
            .collect()
    }

    #[test]
    fn unknown_key_reads_empty() {
        let (store, _) = store(100, 60);
        assert!(store.messages_for_completion("k").is_empty());
        assert!(store.raw("k").is_empty());
        assert_eq!(store.display("k"), UNKNOWN_CONTEXT);
        assert!(!store.is_known("k"));
    }

    #[test]
    fn ensure_default_does_not_overwrite() {
        let (store, _) = store(100, 60);
        assert!(store.ensure_default("k", "first"));
        assert!(!store.ensure_default("k", "first"));
        assert!(!store.ensure_default("k", "second"));
        let raw = store.raw("k");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].role, Role::System);
        assert_eq!(raw[0].content, "first");
        assert!(raw[0].never_expires());
    }

    #[test]
    fn append_stamps_with_clock() {
        let (store, _) = store(100, 60);
        store.append("k", MessageRecord::user("hi"));
        assert_eq!(store.raw("k")[0].timestamp(), Some(10_000));
    }

    #[test]
    fn zero_timestamp_record_gets_clock_time() {
        let (store, _) = store(100, 60);
        store.append("k", MessageRecord::at(Role::User, "hi", 0));
        assert_eq!(store.raw("k")[0].timestamp(), Some(10_000));
        assert_eq!(store.messages_for_completion("k").len(), 1);
    }

    #[test]
    fn append_within_budget_keeps_everything() {
        let (store, _) = store(10, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("abc"));
        let outcome = store.append("k", MessageRecord::assistant("defg"));
        assert_eq!(outcome.evicted, None);
        assert_eq!(outcome.total_chars, 10);
        assert_eq!(contents(&store, "k"), vec!["sys", "abc", "defg"]);
    }

    #[test]
    fn over_budget_evicts_first_turn_after_prompt() {
        let (store, _) = store(10, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("abc"));
        store.append("k", MessageRecord::assistant("defg"));
        let outcome = store.append("k", MessageRecord::user("h"));
        assert_eq!(
            outcome.evicted.map(|record| record.content),
            Some("abc".to_string())
        );
        assert_eq!(outcome.total_chars, 8);
        assert_eq!(contents(&store, "k"), vec!["sys", "defg", "h"]);
    }

    #[test]
    fn single_eviction_may_leave_history_over_budget() {
        let (store, _) = store(5, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("aaaa"));
        store.append("k", MessageRecord::user("bbbb"));
        assert_eq!(contents(&store, "k"), vec!["sys", "bbbb"]);
        let outcome = store.append("k", MessageRecord::user("cccc"));
        assert_eq!(contents(&store, "k"), vec!["sys", "cccc"]);
        assert_eq!(outcome.total_chars, 7);
        assert!(outcome.total_chars > 5);
    }

    #[test]
    fn two_entry_history_is_never_trimmed() {
        let (store, _) = store(3, 60);
        store.ensure_default("k", "sys");
        let outcome = store.append("k", MessageRecord::user("a long message"));
        assert_eq!(outcome.evicted, None);
        assert_eq!(contents(&store, "k"), vec!["sys", "a long message"]);
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let (store, _) = store(4, 60);
        store.ensure_default("k", "系统");
        store.append("k", MessageRecord::user("你"));
        let outcome = store.append("k", MessageRecord::assistant("好"));
        assert_eq!(outcome.total_chars, 4);
        assert_eq!(outcome.evicted, None);
    }

    #[test]
    fn expired_records_hidden_from_completion_but_kept_raw() {
        let (store, clock) = store(1000, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("old"));
        clock.advance(61);
        let completion = store.messages_for_completion("k");
        assert_eq!(completion.len(), 1);
        assert_eq!(completion[0].role, Role::System);
        assert_eq!(contents(&store, "k"), vec!["sys", "old"]);
    }

    #[test]
    fn record_at_window_boundary_is_still_valid() {
        let (store, clock) = store(1000, 60);
        store.append("k", MessageRecord::user("edge"));
        clock.advance(60);
        assert_eq!(store.messages_for_completion("k").len(), 1);
    }

    #[test]
    fn append_compacts_expired_records() {
        let (store, clock) = store(1000, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("old"));
        clock.advance(120);
        let outcome = store.append("k", MessageRecord::user("new"));
        assert_eq!(outcome.expired, 1);
        assert_eq!(contents(&store, "k"), vec!["sys", "new"]);
    }

    #[test]
    fn system_prompt_survives_any_elapsed_time() {
        let (store, clock) = store(1000, 1);
        store.ensure_default("k", "sys");
        clock.set(u64::MAX);
        assert_eq!(store.messages_for_completion("k").len(), 1);
    }

    #[test]
    fn display_renders_role_and_content_lines() {
        let (store, _) = store(1000, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("hello"));
        assert_eq!(store.display("k"), "system: sys\nuser: hello\n");
    }

    #[test]
    fn clear_leaves_known_empty_history_and_reseeds() {
        let (store, _) = store(1000, 60);
        store.ensure_default("k", "sys");
        store.append("k", MessageRecord::user("hello"));
        store.clear("k");
        assert!(store.is_known("k"));
        assert!(store.raw("k").is_empty());
        assert_eq!(store.display("k"), "");
        assert!(store.ensure_default("k", "new"));
        assert_eq!(contents(&store, "k"), vec!["new"]);
    }

    #[test]
    fn clear_all_forgets_every_participant() {
        let (store, _) = store(1000, 60);
        store.ensure_default("a", "sys");
        store.append("b", MessageRecord::user("hi"));
        assert_eq!(store.participant_count(), 2);
        store.clear_all();
        assert_eq!(store.participant_count(), 0);
        for key in ["a", "b"] {
            assert!(!store.is_known(key));
            assert!(store.raw(key).is_empty());
            assert!(store.messages_for_completion(key).is_empty());
            assert_eq!(store.display(key), UNKNOWN_CONTEXT);
        }
        assert!(store.ensure_default("a", "fresh"));
        assert_eq!(contents(&store, "a"), vec!["fresh"]);
    }

    #[test]
    fn clones_share_state() {
        let (store, _) = store(1000, 60);
        let other = store.clone();
        other.append("k", MessageRecord::user("hi"));
        assert_eq!(contents(&store, "k"), vec!["hi"]);
    }
}
