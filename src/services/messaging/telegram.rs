use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::MessagingProvider;

pub struct TelegramProvider {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramProvider {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessagingProvider for TelegramProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        self.client
            .post(&url)
            .json(&json!({
                "chat_id": to,
                "text": body,
            }))
            .send()
            .await
            .context("failed to call Telegram sendMessage")?
            .error_for_status()
            .context("Telegram API returned error")?;

        Ok(())
    }
}
