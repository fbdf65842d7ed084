pub mod cooldown;
pub mod health;
pub mod notifier;
pub mod reply_router;
pub mod status;
pub mod toggl;
pub mod traits;
pub mod wake;
