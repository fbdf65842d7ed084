use async_trait::async_trait;
use std::time::Duration;
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::{Request, Requester};
use teloxide::types::{ChatId, MessageId, ParseMode};
use teloxide::Bot;

use crate::error::DeliveryError;
use crate::services::traits::NotificationChannel;
use crate::utils::logging::log_timeout;
use crate::utils::validation::parse_chat_id;

/// Sends HTML messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, timeout: Duration) -> Self {
        Self { bot, timeout }
    }
}

#[async_trait]
impl NotificationChannel for TelegramNotifier {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, DeliveryError> {
        let chat = parse_chat_id(chat_id)
            .map_err(|_| DeliveryError::InvalidDestination(chat_id.to_string()))?;

        let mut request = self
            .bot
            .send_message(ChatId(chat), text.to_string())
            .parse_mode(ParseMode::Html);
        if let Some(message_id) = reply_to {
            request = request
                .reply_to_message_id(MessageId(message_id))
                .allow_sending_without_reply(true);
        }

        match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(message)) => Ok(message.id.0),
            Ok(Err(e)) => Err(DeliveryError::from(e)),
            Err(_) => {
                let details = format!("chat {}", chat_id);
                log_timeout("send_message", self.timeout.as_secs(), Some(&details));
                Err(DeliveryError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
