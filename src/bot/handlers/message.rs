use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::handlers::{general_message, BotServices, HandlerResult, InboundReply};
use crate::services::reply_router::ReplyRouter;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: BotServices,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "⏰ Welcome to Nudge Bot!\n\nUse /wake <name> to nudge a study buddy, or /wakeall to nudge everyone.\nUse /status <name> to see if someone is already studying.\nReply to a nudge and your answer goes straight back to whoever sent it.\nUse /help to see all commands.",
            ).await?;
        }
        Command::Users => {
            crate::bot::commands::users::handle_users(bot, msg, services.db.as_ref()).await?;
        }
        Command::Wake(args) => {
            crate::bot::commands::wake::handle_wake(bot, msg, args, &services.engine).await?;
        }
        Command::WakeAll(args) => {
            crate::bot::commands::wake::handle_wake_all(bot, msg, args, &services.engine).await?;
        }
        Command::Status(args) => {
            crate::bot::commands::status::handle_status(bot, msg, args, &services.status).await?;
        }
        Command::StatusAll => {
            crate::bot::commands::status::handle_status_all(bot, msg, &services.status).await?;
        }
    }
    Ok(())
}

/// Non-command messages: replies to nudges first, then the general fallback.
pub async fn plain_message_handler(
    bot: Bot,
    msg: Message,
    router: Arc<ReplyRouter>,
) -> HandlerResult {
    if let Some(reply) = InboundReply::from_message(&msg) {
        let forwarded = router
            .route_reply(&reply.chat_id, reply.in_reply_to, &reply.text, &reply.replier)
            .await;
        if forwarded {
            return Ok(());
        }
    }

    general_message::handle_general_message(bot, msg).await
}
