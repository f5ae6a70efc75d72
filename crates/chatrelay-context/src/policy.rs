//! Budget and expiry policy consulted by the conversation store.

/// Character budget used when none is configured.
pub const DEFAULT_MAX_TOKENS: usize = 1000;
/// Expiry window used when none is configured.
pub const DEFAULT_EXPIRY_WINDOW_SECS: u64 = 3600;

/// Limits applied to every conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextPolicy {
    /// Maximum summed character count of a history before eviction.
    pub max_tokens: usize,
    /// Seconds after which a non-system record is treated as expired.
    pub expiry_window_secs: u64,
}

impl ContextPolicy {
    /// Build a policy from raw configured values, where zero means "use the default".
    pub fn from_configured(max_tokens: usize, expiry_window_secs: u64) -> Self {
        Self {
            max_tokens: if max_tokens == 0 {
                DEFAULT_MAX_TOKENS
            } else {
                max_tokens
            },
            expiry_window_secs: if expiry_window_secs == 0 {
                DEFAULT_EXPIRY_WINDOW_SECS
            } else {
                expiry_window_secs
            },
        }
    }
}

impl Default for ContextPolicy {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            expiry_window_secs: DEFAULT_EXPIRY_WINDOW_SECS,
        }
    }
}

/// Source of the policy, resolved on every store call so reloads apply immediately.
pub trait PolicySource: Send + Sync {
    /// Current policy.
    fn context_policy(&self) -> ContextPolicy;
}

impl PolicySource for ContextPolicy {
    fn context_policy(&self) -> ContextPolicy {
        *self
    }
}
