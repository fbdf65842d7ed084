use teloxide::prelude::*;
use crate::bot::handlers::HandlerResult;
use crate::utils::feedback::CommandFeedback;

pub async fn handle_general_message(
    bot: Bot,
    msg: Message,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    if let Some(text) = msg.text() {
        // Check if it looks like a malformed command
        if text.starts_with('/') {
            let error_msg = format!("Unknown command: {}", text.split_whitespace().next().unwrap_or(text));
            let suggestion = "Use /help to see all available commands, or check your command syntax.";
            feedback.validation_error(&error_msg, suggestion).await?;
        } else if text.to_lowercase().contains("wake") {
            // Helpful hint for users trying to nudge someone
            feedback.info("Want to nudge someone? Try /wake <name> [message] or /wakeall [message].").await?;
        }
        // For other messages, we don't respond to avoid spam
    }

    Ok(())
}
