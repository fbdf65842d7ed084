pub mod general_message;
pub mod message;

use std::sync::Arc;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::bot::commands::Command;
use crate::database::connection::DatabaseManager;
use crate::services::{reply_router::ReplyRouter, status::StatusChecker, wake::WakeEngine};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

/// Everything a handler may need, cloned into each endpoint.
#[derive(Clone)]
pub struct BotServices {
    pub db: Arc<DatabaseManager>,
    pub engine: Arc<WakeEngine>,
    pub router: Arc<ReplyRouter>,
    pub status: Arc<StatusChecker>,
}

/// The person behind a message, with identifiers normalized to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub name: String,
}

impl Sender {
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.from().map(|user| Sender {
            id: user.id.0.to_string(),
            name: user.full_name(),
        })
    }
}

/// A reply to an earlier message, as seen by the reply router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundReply {
    pub chat_id: String,
    pub in_reply_to: i32,
    pub text: String,
    pub replier: String,
}

impl InboundReply {
    pub fn from_message(msg: &Message) -> Option<Self> {
        let parent = msg.reply_to_message()?;
        let text = msg.text().or_else(|| msg.caption())?;
        let replier = msg
            .from()
            .map(|user| user.full_name())
            .unwrap_or_else(|| "Someone".to_string());

        Some(InboundReply {
            chat_id: msg.chat.id.0.to_string(),
            in_reply_to: parent.id.0,
            text: text.to_string(),
            replier,
        })
    }
}

pub struct BotHandler {
    pub services: BotServices,
}

impl BotHandler {
    pub fn new(services: BotServices) -> Self {
        Self { services }
    }

    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        let command_services = self.services.clone();
        let router = self.services.router.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let services = command_services.clone();
                        async move { message::command_handler(bot, msg, cmd, services).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let router = router.clone();
                async move { message::plain_message_handler(bot, msg, router).await }
            }))
    }
}
