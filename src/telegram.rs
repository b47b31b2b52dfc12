//! Thin Telegram Bot API transport: long polling in, messages out.
//!
//! This is the external collaborator side of the pipeline; everything it
//! does is mapping `/commands` onto [`BotService`] and implementing the
//! [`Notifier`] delivery seam via `sendMessage`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{BotError, Result};
use crate::models::UserId;
use crate::notifier::Notifier;
use crate::service::BotService;

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

/// One incoming update from getUpdates
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

/// Incoming chat message
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

/// Chat the message arrived from
#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl TelegramClient {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://api.telegram.org/bot{token}"),
            poll_timeout_secs,
        }
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let url = format!("{}/getUpdates", self.base_url);
        let response: UpdatesResponse = self
            .client
            .get(&url)
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
            ])
            // Allow headroom over the server-side long-poll window
            .timeout(Duration::from_secs(self.poll_timeout_secs + 10))
            .send()
            .await
            .map_err(|e| BotError::Delivery(format!("getUpdates failed: {e}")))?
            .error_for_status()
            .map_err(|e| BotError::Delivery(format!("getUpdates failed: {e}")))?
            .json()
            .await
            .map_err(|e| BotError::Delivery(format!("getUpdates parse failed: {e}")))?;

        if !response.ok {
            return Err(BotError::Delivery("getUpdates returned ok=false".to_string()));
        }
        Ok(response.result)
    }

    /// Send one text message to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        self.client
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| BotError::Delivery(format!("sendMessage failed: {e}")))?
            .error_for_status()
            .map_err(|e| BotError::Delivery(format!("sendMessage failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, user: UserId, text: &str) -> Result<()> {
        self.send_message(user.0, text).await
    }
}

/// Split a `/command arg...` line into the bare command and its argument
/// string, stripping any `@botname` suffix.
fn parse_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }
    let (command, args) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let command = command.split('@').next().unwrap_or(command);
    Some((command, args.trim()))
}

/// Route one inbound message to the service
async fn dispatch(service: &BotService, user: UserId, text: &str) -> Result<()> {
    let Some((command, args)) = parse_command(text) else {
        debug!(%user, "Ignoring non-command message");
        return Ok(());
    };

    match command {
        "/start" => service.start(user).await,
        "/set_filters" => service.set_filters(user, args).await,
        "/search" => service.search(user).await,
        "/clear_filters" => service.clear_filters(user).await,
        "/set_schedule" => service.set_schedule(user, args).await,
        "/remove_schedule" => service.remove_schedule(user).await,
        other => {
            debug!(%user, command = other, "Unknown command");
            Ok(())
        }
    }
}

/// Long-polling loop: fetch updates, dispatch commands, advance the offset.
///
/// Transport errors back off briefly and retry; command errors are logged
/// per update and never stop the loop.
pub async fn run_polling(client: Arc<TelegramClient>, service: Arc<BotService>) {
    let mut offset = 0i64;

    loop {
        let updates = match client.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Polling for updates failed, backing off");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else { continue };
            let Some(text) = message.text else { continue };
            let user = UserId(message.chat.id);

            if let Err(e) = dispatch(&service, user, &text).await {
                error!(%user, error = %e, "Command handling failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_with_args() {
        assert_eq!(
            parse_command("/set_filters Backend Developer"),
            Some(("/set_filters", "Backend Developer"))
        );
    }

    #[test]
    fn test_parse_command_strips_bot_suffix() {
        assert_eq!(
            parse_command("/search@job_finder_bot"),
            Some(("/search", ""))
        );
    }

    #[test]
    fn test_parse_non_command() {
        assert_eq!(parse_command("hello there"), None);
    }
}
