//! Telegram client using teloxide.

use teloxide::prelude::*;
use tracing::warn;

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send a plain-text message to a chat.
    ///
    /// Callers treat this as fire-and-forget; failures are logged here and
    /// surfaced only as the returned error string.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send to chat {chat_id}: {e}");
                warn!("{}", msg);
                msg
            })
    }
}
