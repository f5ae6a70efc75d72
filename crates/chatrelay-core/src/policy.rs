//! Conversation policy backed by the live config.

use chatrelay_config::ConfigHandle;
use chatrelay_context::{ContextPolicy, PolicySource};
use std::sync::Arc;

/// Resolves budget and expiry from the active config on every call.
#[derive(Debug, Clone)]
pub struct ConfigPolicy {
    config: Arc<ConfigHandle>,
}

impl ConfigPolicy {
    pub fn new(config: Arc<ConfigHandle>) -> Self {
        Self { config }
    }
}

impl PolicySource for ConfigPolicy {
    fn context_policy(&self) -> ContextPolicy {
        let config = self.config.current();
        ContextPolicy::from_configured(config.conversation_max_tokens, config.conversation_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigPolicy;
    use chatrelay_config::{ConfigHandle, RelayConfig};
    use chatrelay_context::{ContextPolicy, PolicySource};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn unset_values_use_defaults() {
        let handle = ConfigHandle::from_config("unused.json", RelayConfig::default());
        let policy = ConfigPolicy::new(Arc::new(handle));
        assert_eq!(policy.context_policy(), ContextPolicy::default());
    }

    #[test]
    fn config_edits_apply_on_next_call() {
        let temp = TempDir::new().expect("tmp");
        let handle = Arc::new(ConfigHandle::from_config(
            temp.path().join("chatrelay.json"),
            RelayConfig::builder().conversation_max_tokens(10).build(),
        ));
        let policy = ConfigPolicy::new(handle.clone());
        assert_eq!(policy.context_policy().max_tokens, 10);

        handle
            .update(|config| config.conversation_max_tokens = 20)
            .expect("update");
        assert_eq!(policy.context_policy().max_tokens, 20);
    }
}
