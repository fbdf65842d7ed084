use std::sync::Arc;

use crate::services::traits::{EventLog, NotificationChannel};
use crate::utils::html::escape_html;

/// Builds the text forwarded to the person who asked for the wake.
pub fn compose_forwarded_reply(replier_name: &str, reply_text: &str) -> String {
    format!("{} : {}", escape_html(replier_name), escape_html(reply_text))
}

/// Forwards the first reply to a delivered nudge back to its requester.
pub struct ReplyRouter {
    events: Arc<dyn EventLog>,
    channel: Arc<dyn NotificationChannel>,
}

impl ReplyRouter {
    pub fn new(events: Arc<dyn EventLog>, channel: Arc<dyn NotificationChannel>) -> Self {
        Self { events, channel }
    }

    /// Returns true when the reply belonged to a nudge and was forwarded.
    ///
    /// `reply_chat_id` is the chat the reply was written in, which is the
    /// chat the nudge was delivered to.
    pub async fn route_reply(
        &self,
        reply_chat_id: &str,
        in_reply_to_message_id: i32,
        reply_text: &str,
        replier_name: &str,
    ) -> bool {
        let event = match self
            .events
            .find_by_notification(reply_chat_id, in_reply_to_message_id)
            .await
        {
            Ok(Some(event)) => event,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(
                    "Wake log lookup failed for message {} in chat {}: {}",
                    in_reply_to_message_id, reply_chat_id, e
                );
                return false;
            }
        };

        if event.reply_used {
            tracing::debug!("Ignoring second reply to wake event {}", event.id);
            return false;
        }

        let text = compose_forwarded_reply(replier_name, reply_text);
        // The command message id only means something in the chat it was sent in.
        let reply_to = (event.command_chat_id == event.sender).then_some(event.command_message_id);
        if let Err(e) = self.channel.send(&event.sender, &text, reply_to).await
        {
            // Leave the event unused so a later reply can still get through.
            tracing::warn!("Failed to forward reply for wake event {} to {}: {}", event.id, event.sender, e);
            return false;
        }

        if let Err(e) = self.events.mark_reply_used(&event.id).await {
            tracing::error!("Forwarded reply but could not mark wake event {} as used: {}", event.id, e);
        }

        tracing::info!("Forwarded reply from {} to {} for wake event {}", replier_name, event.sender, event.id);
        true
    }
}
