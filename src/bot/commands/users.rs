use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::database::models::Person;
use crate::services::traits::Directory;
use crate::utils::{feedback::CommandFeedback, html::{capitalize, escape_html}};

/// Renders the people list as Telegram HTML.
pub fn format_people(people: &[Person]) -> String {
    if people.is_empty() {
        return "👥 No users found.".to_string();
    }

    let mut message = String::from("👥 <b>Users List</b>\n");
    for person in people {
        let reachable = if person.chat_id.is_some() { "" } else { " (no chat)" };
        message.push_str(&format!("\n• {}{}", escape_html(&capitalize(&person.name)), reachable));
    }
    message
}

pub async fn handle_users(
    bot: Bot,
    msg: Message,
    directory: &dyn Directory,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id);

    match directory.list_people().await {
        Ok(people) => {
            feedback.send_html(&format_people(&people)).await?;
        }
        Err(e) => {
            tracing::error!("Failed to fetch users: {}", e);
            feedback.error("Failed to fetch users.").await?;
        }
    }

    Ok(())
}
