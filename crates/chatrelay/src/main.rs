//! Command-line entry point for the chat relay.

use anyhow::Context;
use chatrelay::config::{ConfigHandle, DEFAULT_CONFIG_FILE};
use chatrelay::console::{ConsoleTransport, write_reply};
use chatrelay::core::{MessageHandler, OpenAiClient};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

/// Command-line options for the relay.
#[derive(Debug, Parser)]
#[command(name = "chatrelay", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start answering messages read from stdin
    Start {
        /// Path to the JSON config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Log level (error, warn, info, debug, trace)
        #[arg(long, default_value = "info")]
        log_level: String,
        /// Nick name used for plain console lines
        #[arg(long, default_value = "console")]
        sender: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Start {
            config,
            log_level,
            sender,
        } => {
            chatrelay::init_logging(&log_level);
            start(config, sender).await
        }
    }
}

async fn start(config_path: PathBuf, sender: String) -> anyhow::Result<()> {
    info!("loading config (path={})", config_path.display());
    let config = Arc::new(ConfigHandle::open(&config_path).context("failed to load config")?);
    let current = config.current();
    if current.token.is_empty() {
        warn!("no API token configured; completion requests will be rejected");
    }
    let completion = Arc::new(OpenAiClient::from_config(&current));
    info!(
        "starting relay (model={}, groups={}, sender={})",
        current.completion.model,
        current.group_name_white_list().len(),
        sender
    );
    drop(current);

    let handler = MessageHandler::new(config, completion);
    let mut transport = ConsoleTransport::new(sender);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let Some(msg) = transport.parse_line(&line) else {
            continue;
        };
        let handler = handler.clone();
        tasks.spawn(async move {
            let key = msg.participant_key();
            let result = match handler.handle(&msg).await {
                Ok(Some(reply)) => write_reply(&mut tokio::io::stdout(), &key, &reply).await,
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                error!("failed to handle message (key={}, err={})", key, err);
            }
        });
        while let Some(joined) = tasks.try_join_next() {
            log_task_failure(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_task_failure(joined);
    }
    info!("stdin closed, shutting down");
    Ok(())
}

fn log_task_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        error!("message task failed (err={})", err);
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn start_uses_defaults() {
        let cli = Cli::try_parse_from(["chatrelay", "start"]).expect("parse");
        let Command::Start {
            config,
            log_level,
            sender,
        } = cli.command;
        assert_eq!(config, PathBuf::from("chatrelay.json"));
        assert_eq!(log_level, "info");
        assert_eq!(sender, "console");
    }

    #[test]
    fn start_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "chatrelay",
            "start",
            "-c",
            "/etc/relay.json",
            "--log-level",
            "debug",
            "--sender",
            "alice",
        ])
        .expect("parse");
        let Command::Start {
            config,
            log_level,
            sender,
        } = cli.command;
        assert_eq!(config, PathBuf::from("/etc/relay.json"));
        assert_eq!(log_level, "debug");
        assert_eq!(sender, "alice");
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["chatrelay"]).is_err());
    }
}
