//! Message dispatch: routes inbound messages to commands or the completion API.

mod admin;
mod format;

use crate::command::{ADMIN_FORMAT_ERROR, Command};
use crate::completion::{CompletionClient, CompletionRequest};
use crate::error::RelayCoreError;
use crate::message::{InboundMessage, MessageKind};
use crate::policy::ConfigPolicy;
use chatrelay_config::ConfigHandle;
use chatrelay_context::{Clock, ContextStore, MessageRecord};
use log::{debug, info, warn};
use std::sync::Arc;

pub use format::{PAT_REPLY, PAT_SUFFIX};

/// Handles inbound messages for one bot account.
///
/// Cheap to clone; clones share the config, store and completion client.
#[derive(Clone)]
pub struct MessageHandler {
    config: Arc<ConfigHandle>,
    store: ContextStore,
    completion: Arc<dyn CompletionClient>,
}

impl MessageHandler {
    /// Create a handler with a fresh context store driven by `config`.
    pub fn new(config: Arc<ConfigHandle>, completion: Arc<dyn CompletionClient>) -> Self {
        let store = ContextStore::new(Arc::new(ConfigPolicy::new(config.clone())));
        Self::with_store(config, store, completion)
    }

    /// Like [`MessageHandler::new`] with an explicit clock.
    pub fn with_clock(
        config: Arc<ConfigHandle>,
        completion: Arc<dyn CompletionClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = ContextStore::with_clock(Arc::new(ConfigPolicy::new(config.clone())), clock);
        Self::with_store(config, store, completion)
    }

    /// Create a handler around an existing store.
    pub fn with_store(
        config: Arc<ConfigHandle>,
        store: ContextStore,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
        }
    }

    /// Context store shared by this handler.
    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    /// Live config handle.
    pub fn config(&self) -> &Arc<ConfigHandle> {
        &self.config
    }

    /// Handle one inbound message and return the reply to send, if any.
    pub async fn handle(&self, msg: &InboundMessage) -> Result<Option<String>, RelayCoreError> {
        match msg.kind {
            MessageKind::Text => {
                if let Some(reason) = self.group_filter_rejection(msg) {
                    debug!(
                        "ignoring group message (key={}, reason={})",
                        msg.participant_key(),
                        reason
                    );
                    return Ok(None);
                }
                self.reply_text(msg).await.map(Some)
            }
            MessageKind::System => Ok(self.reply_system(msg)),
            MessageKind::StatusNotify => Ok(None),
            MessageKind::Other(code) => Err(RelayCoreError::UnsupportedMessage(code)),
        }
    }

    /// Why a group message must be ignored, or `None` if it should be answered.
    fn group_filter_rejection(&self, msg: &InboundMessage) -> Option<String> {
        let group = msg.group.as_ref()?;
        let config = self.config.current();
        let mut reasons = Vec::new();
        if !config.matches_group_chat_prefix(&msg.content) {
            reasons.push("not addressed to the bot");
        }
        if !config.matches_group_name(&group.nick_name) {
            reasons.push("group not whitelisted");
        }
        (!reasons.is_empty()).then(|| reasons.join("; "))
    }

    async fn reply_text(&self, msg: &InboundMessage) -> Result<String, RelayCoreError> {
        let key = msg.participant_key();
        let config = self.config.current();
        let content = if msg.is_from_group() {
            config
                .strip_group_chat_prefix(&msg.content)
                .unwrap_or(msg.content.as_str())
        } else {
            msg.content.as_str()
        };
        info!("received message (key={}, content={})", key, content);

        match Command::parse(content) {
            Command::Ping => Ok("pong".to_string()),
            Command::ShowContext => Ok(self.store.display(&key)),
            Command::Reload => Ok(match self.config.reload() {
                Ok(_) => "reload success".to_string(),
                Err(err) => format!("reload failed: {err}"),
            }),
            Command::Admin(Ok(command)) => self.run_admin(command, &key),
            Command::Admin(Err(err)) => {
                warn!("rejected admin command (key={}, err={})", key, err);
                Ok(ADMIN_FORMAT_ERROR.to_string())
            }
            Command::Chat(text) => self.chat(msg, &key, text).await,
        }
    }

    /// Forward `text` with the participant's context and record the reply.
    async fn chat(
        &self,
        msg: &InboundMessage,
        key: &str,
        text: &str,
    ) -> Result<String, RelayCoreError> {
        let config = self.config.current();
        self.store.ensure_default(key, config.default_prompt());
        self.store.append(key, MessageRecord::user(text));

        let messages = self.store.messages_for_completion(key);
        let request = CompletionRequest::from_config(&config, messages);
        let body = self.completion.complete(&request).await?;

        let reply = format::mention_reply(msg, &body);
        self.store.append(key, MessageRecord::assistant(body.clone()));
        info!(
            "{}",
            format::exchange_log(key, text, &body, &self.store.raw(key))
        );
        Ok(reply)
    }

    fn reply_system(&self, msg: &InboundMessage) -> Option<String> {
        info!("received system message (content={})", msg.content);
        format::pat_reply(&msg.content)
    }
}
