//! Push delivery over the Telegram Bot API.

use crate::error::PushError;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Outbound push-message transport. The core decides what to send and when;
/// implementations own wire delivery.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PushError>;
}

pub struct TelegramPush {
    client: reqwest::Client,
    bot_token: String,
}

impl TelegramPush {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
        }
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[async_trait]
impl PushTransport for TelegramPush {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), PushError> {
        let api_url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let response = self
            .client
            .post(&api_url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let context = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(PushError::Rejected {
                status: status.as_u16(),
                context,
            });
        }
        debug!(chat_id, "push message delivered");
        Ok(())
    }
}
