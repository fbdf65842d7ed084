use teloxide::prelude::*;
use teloxide::types::{ParseMode, MessageId};
use crate::utils::html::escape_html;

/// Feedback types for different command outcomes
#[derive(Debug, Clone)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Processing,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Processing => "⏳",
        }
    }
}

/// Centralized feedback system for bot commands
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id, reply_to: None }
    }

    /// Thread every feedback message under the command that triggered it
    pub fn replying_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    /// Send plain text, escaped and prefixed with the feedback emoji
    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        let formatted_message = format!("{} {}", feedback_type.emoji(), escape_html(message));
        self.send_html(&formatted_message).await
    }

    /// Send text that is already valid Telegram HTML
    pub async fn send_html(&self, html: &str) -> ResponseResult<Message> {
        let request = self.bot
            .send_message(self.chat_id, html.to_string())
            .parse_mode(ParseMode::Html);

        match self.reply_to {
            Some(message_id) => {
                request
                    .reply_to_message_id(message_id)
                    .allow_sending_without_reply(true)
                    .await
            }
            None => request.await,
        }
    }

    /// Send a processing message that can be updated later
    pub async fn send_processing(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Processing, message).await
    }

    /// Replace an existing message with already formatted HTML
    pub async fn update_html(&self, message_id: MessageId, html: &str) -> ResponseResult<Message> {
        self.bot
            .edit_message_text(self.chat_id, message_id, html.to_string())
            .parse_mode(ParseMode::Html)
            .await
    }

    /// Send success feedback
    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    /// Send error feedback
    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    /// Send warning feedback
    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    /// Send info feedback
    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!(
            "{} {}\n\n💡 <b>Suggestion:</b> {}",
            FeedbackType::Error.emoji(),
            escape_html(error),
            escape_html(suggestion)
        );
        self.send_html(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Processing.emoji(), "⏳");
    }
}
