use anyhow::Result;
use teloxide::prelude::*;

use crate::bot::handlers::{HandlerResult, Sender};
use crate::services::wake::{WakeEngine, WakeOutcome, WakeRequest};
use crate::utils::{
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_start, log_command_success, log_validation_error},
    validation::{validate_custom_message, validate_target_name},
};

const WAKE_USAGE: &str = "Use /wake <name> [message], for example: /wake bob time to study!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeTarget {
    Everyone,
    Person(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeArgs {
    pub target: WakeTarget,
    pub message: Option<String>,
}

/// Splits `/wake` arguments into the target name and an optional message.
///
/// `all` as the name wakes everybody.
pub fn parse_wake_args(args: &str) -> Result<WakeArgs> {
    let args = args.trim();
    let (name, rest) = match args.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (args, ""),
    };

    validate_target_name(name)?;
    let message = parse_custom_message(rest)?;

    let target = if name.eq_ignore_ascii_case("all") {
        WakeTarget::Everyone
    } else {
        WakeTarget::Person(name.to_string())
    };

    Ok(WakeArgs { target, message })
}

/// Blank means no message.
pub fn parse_custom_message(raw: &str) -> Result<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    validate_custom_message(raw)?;
    Ok(Some(raw.to_string()))
}

pub async fn handle_wake(
    bot: Bot,
    msg: Message,
    args: String,
    engine: &WakeEngine,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id).replying_to(msg.id);
    let chat_id = msg.chat.id.0.to_string();

    let Some(sender) = Sender::from_message(&msg) else {
        feedback.error("I can't tell who is asking, so I can't wake anyone for you.").await?;
        return Ok(());
    };

    log_command_start("wake", &sender.name, &sender.id, &chat_id, Some(&args));

    let parsed = match parse_wake_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            log_validation_error("wake", "args", &args, &e.to_string(), &sender.id);
            feedback.validation_error(&e.to_string(), WAKE_USAGE).await?;
            return Ok(());
        }
    };

    let request = WakeRequest::new(&sender.id, &sender.name, parsed.message, msg.id.0).in_chat(&chat_id);

    let name = match parsed.target {
        WakeTarget::Everyone => {
            return wake_everyone(&feedback, &request, engine, &sender, &chat_id).await;
        }
        WakeTarget::Person(name) => name,
    };

    let outcome = engine.request_wake(&request, &name).await;
    let status = outcome.to_string();
    match &outcome {
        WakeOutcome::Woken { .. } => {
            feedback.success(&status).await?;
            log_command_success("wake", &sender.name, &sender.id, &chat_id, Some(&status));
        }
        WakeOutcome::DeliveryFailed { .. } | WakeOutcome::DirectoryUnavailable => {
            feedback.error(&status).await?;
            log_command_error("wake", &sender.name, &sender.id, &chat_id, &status);
        }
        _ => {
            feedback.warning(&status).await?;
            log_command_success("wake", &sender.name, &sender.id, &chat_id, Some(&status));
        }
    }

    Ok(())
}

pub async fn handle_wake_all(
    bot: Bot,
    msg: Message,
    args: String,
    engine: &WakeEngine,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot, msg.chat.id).replying_to(msg.id);
    let chat_id = msg.chat.id.0.to_string();

    let Some(sender) = Sender::from_message(&msg) else {
        feedback.error("I can't tell who is asking, so I can't wake anyone for you.").await?;
        return Ok(());
    };

    log_command_start("wakeall", &sender.name, &sender.id, &chat_id, Some(&args));

    let message = match parse_custom_message(&args) {
        Ok(message) => message,
        Err(e) => {
            log_validation_error("wakeall", "message", &args, &e.to_string(), &sender.id);
            feedback
                .validation_error(&e.to_string(), "Keep the message short, for example: /wakeall library in 10!")
                .await?;
            return Ok(());
        }
    };

    let request = WakeRequest::new(&sender.id, &sender.name, message, msg.id.0).in_chat(&chat_id);
    wake_everyone(&feedback, &request, engine, &sender, &chat_id).await
}

async fn wake_everyone(
    feedback: &CommandFeedback,
    request: &WakeRequest,
    engine: &WakeEngine,
    sender: &Sender,
    chat_id: &str,
) -> HandlerResult {
    let processing = feedback.send_processing("Waking everyone up...").await?;
    let report = engine.request_wake_all(request).await;
    feedback.update_html(processing.id, &report.to_html()).await?;

    let details = format!("{} woken", report.woken_count());
    log_command_success("wakeall", &sender.name, &sender.id, chat_id, Some(&details));
    Ok(())
}
