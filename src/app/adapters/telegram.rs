//! Telegram delivery sink
//!
//! Sends each rendered message to every configured chat via the Bot API.
//! A failed send to one chat does not stop delivery to the others; the
//! cycle fails with a delivery error only when every send failed.

use crate::app::adapters::ReportSink;
use crate::constants::endpoints;
use crate::{Error, Result};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramSink {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_ids: Vec<String>,
}

impl TelegramSink {
    pub fn new(bot_token: impl Into<String>, chat_ids: Vec<String>) -> Self {
        Self::with_api_base(endpoints::TELEGRAM_API_BASE, bot_token, chat_ids)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_ids: Vec<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_ids,
        }
    }

    async fn send_one(&self, chat_id: &str, text: &str) -> std::result::Result<(), String> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("API status {}", response.status()))
        }
    }
}

impl ReportSink for TelegramSink {
    async fn deliver(&self, messages: &[String]) -> Result<()> {
        if self.chat_ids.is_empty() {
            return Err(Error::delivery("no chat ids configured"));
        }

        let mut delivered = 0usize;
        let mut attempted = 0usize;
        for message in messages {
            for chat_id in &self.chat_ids {
                attempted += 1;
                match self.send_one(chat_id, message).await {
                    Ok(()) => {
                        delivered += 1;
                        debug!("Delivered message to chat {}", chat_id);
                    }
                    Err(reason) => {
                        warn!("Send to chat {} failed: {}", chat_id, reason);
                    }
                }
            }
        }

        if delivered == 0 && attempted > 0 {
            return Err(Error::delivery("every Telegram send failed"));
        }
        Ok(())
    }
}
