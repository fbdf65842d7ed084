use teloxide::prelude::*;

use crate::bot::handlers::HandlerResult;
use crate::services::status::{format_status_report, StatusChecker};
use crate::utils::{
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error},
    validation::validate_target_name,
};

const STATUS_USAGE: &str = "Use /status <name>, for example: /status bob";

/// Who to ask about, or `None` for everybody.
pub fn parse_status_target(args: &str) -> anyhow::Result<Option<String>> {
    let name = args.trim();
    validate_target_name(name)?;
    if name.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    Ok(Some(name.to_string()))
}

pub async fn handle_status(
    bot: Bot,
    msg: Message,
    args: String,
    checker: &StatusChecker,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id).replying_to(msg.id);
    let chat_id = msg.chat.id.0.to_string();
    let (user, user_id) = requester(&msg);

    log_command_start("status", &user, &user_id, &chat_id, Some(&args));

    let name = match parse_status_target(&args) {
        Ok(Some(name)) => name,
        Ok(None) => return report_everyone(&feedback, checker, &user, &user_id, &chat_id).await,
        Err(e) => {
            log_validation_error("status", "name", &args, &e.to_string(), &user_id);
            feedback.validation_error(&e.to_string(), STATUS_USAGE).await?;
            return Ok(());
        }
    };

    match checker.status_of(&name).await {
        Ok(Some(status)) => {
            feedback.send_html(&status.to_html()).await?;
            log_command_success("status", &user, &user_id, &chat_id, Some(&name));
        }
        Ok(None) => {
            feedback.warning(&format!("User '{}' not found.", name)).await?;
            log_command_success("status", &user, &user_id, &chat_id, Some("not found"));
        }
        Err(e) => {
            log_command_error("status", &user, &user_id, &chat_id, &e.to_string());
            feedback.error("Failed to fetch users.").await?;
        }
    }

    Ok(())
}

pub async fn handle_status_all(bot: Bot, msg: Message, checker: &StatusChecker) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id).replying_to(msg.id);
    let chat_id = msg.chat.id.0.to_string();
    let (user, user_id) = requester(&msg);

    log_command_start("statusall", &user, &user_id, &chat_id, None);
    report_everyone(&feedback, checker, &user, &user_id, &chat_id).await
}

async fn report_everyone(
    feedback: &CommandFeedback,
    checker: &StatusChecker,
    user: &str,
    user_id: &str,
    chat_id: &str,
) -> HandlerResult {
    let processing = feedback.send_processing("Checking everyone...").await?;

    match checker.status_of_everyone().await {
        Ok(statuses) => {
            feedback.update_html(processing.id, &format_status_report(&statuses)).await?;
            let details = format!("{} people", statuses.len());
            log_command_success("statusall", user, user_id, chat_id, Some(&details));
        }
        Err(e) => {
            log_command_error("statusall", user, user_id, chat_id, &e.to_string());
            feedback.update_html(processing.id, "❌ Failed to fetch users.").await?;
        }
    }

    Ok(())
}

fn requester(msg: &Message) -> (String, String) {
    match msg.from() {
        Some(user) => (user.full_name(), user.id.0.to_string()),
        None => ("Unknown".to_string(), "unknown".to_string()),
    }
}
