//! Execution of parsed admin commands.

use super::MessageHandler;
use crate::command::AdminCommand;
use crate::error::RelayCoreError;
use log::info;

impl MessageHandler {
    /// Run an admin command issued by `sender_key` and return the reply text.
    pub(super) fn run_admin(
        &self,
        command: AdminCommand,
        sender_key: &str,
    ) -> Result<String, RelayCoreError> {
        info!(
            "running admin command (key={}, command={:?})",
            sender_key, command
        );
        let reply = match command {
            AdminCommand::GroupAdd(name) => {
                self.config.update(|config| config.add_group_name(name))?;
                "add group success".to_string()
            }
            AdminCommand::GroupRemove(name) => {
                let removed = self
                    .config
                    .update(|config| config.remove_group_name(&name))?;
                if removed {
                    "remove group success".to_string()
                } else {
                    format!("group not in whitelist: {name}")
                }
            }
            AdminCommand::GroupList => {
                let config = self.config.current();
                if config.group_name_white_list().is_empty() {
                    "group whitelist is empty".to_string()
                } else {
                    config.group_name_white_list().join("\n")
                }
            }
            AdminCommand::PromptSet(prompt) => {
                self.config
                    .update(|config| config.set_default_prompt(prompt))?;
                "set default prompt success".to_string()
            }
            AdminCommand::PromptGet => self.config.current().default_prompt().to_string(),
            AdminCommand::ContextClear(key) => {
                self.store.clear(key.as_deref().unwrap_or(sender_key));
                "clear context success".to_string()
            }
            AdminCommand::ContextClearAll => {
                self.store.clear_all();
                "clear all context success".to_string()
            }
        };
        Ok(reply)
    }
}
