//! Runtime configuration

use std::path::PathBuf;

use crate::notifier::TelegramNotifier;

/// Snapshot file used when nothing else is configured
pub const DEFAULT_DATA_PATH: &str = "data/prices.json";

/// Resolved settings for one monitor run
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the JSON snapshot document
    pub data_path: PathBuf,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    /// Compute and log diffs without notifying or touching the snapshot
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            telegram_bot_token: None,
            telegram_chat_id: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Bot token and chat id, if both are set and non-empty
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        let token = self.telegram_bot_token.as_deref().filter(|t| !t.trim().is_empty())?;
        let chat_id = self.telegram_chat_id.as_deref().filter(|c| !c.trim().is_empty())?;
        Some((token, chat_id))
    }

    /// Build the notifier, or `None` when credentials are incomplete
    pub fn notifier(&self) -> Option<TelegramNotifier> {
        self.telegram_credentials()
            .map(|(token, chat_id)| TelegramNotifier::new(token, chat_id))
    }
}
