pub mod status;
pub mod users;
pub mod wake;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Nudge Bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "List everyone who can be woken")]
    Users,
    #[command(description = "Wake someone up: /wake <name> [message]")]
    Wake(String),
    #[command(description = "Wake everybody up: /wakeall [message]")]
    WakeAll(String),
    #[command(description = "Check if someone is tracking time: /status <name>")]
    Status(String),
    #[command(description = "Check who is tracking time right now")]
    StatusAll,
}
