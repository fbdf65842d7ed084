//! Cooldown-gated wake nudges.
//!
//! A wake request goes through a fixed decision sequence (unknown target,
//! active cooldown, already tracking, no chat to deliver to) and only the
//! final delivery step touches state: on a confirmed send the requester's
//! cooldown is written to the target's record and a [`WakeEvent`] is logged so
//! a reply can later be routed back by the reply router.
//!
//! There is no locking between the cooldown read and write. Two concurrent
//! wakes of the same target by the same sender can both get through.
//!
//! [`WakeEvent`]: crate::database::models::WakeEvent

use chrono::{Duration, Utc};
use std::fmt;
use std::sync::Arc;

use crate::database::models::{NewWakeEvent, Person};
use crate::services::cooldown::format_remaining;
use crate::services::traits::{Directory, EventLog, NotificationChannel, StatusProbe};
use crate::utils::html::{capitalize, escape_html};
use crate::utils::logging::log_wake_decision;

/// Minutes a requester has to wait before nudging the same person again.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 60;

/// Who is asking for the wake and what they want to say.
#[derive(Debug, Clone)]
pub struct WakeRequest {
    pub sender_id: String,
    pub sender_name: String,
    pub message: Option<String>,
    /// Defaults to the sender's private chat.
    pub command_chat_id: String,
    pub command_message_id: i32,
}

impl WakeRequest {
    pub fn new(
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        message: Option<String>,
        command_message_id: i32,
    ) -> Self {
        let sender_id = sender_id.into();
        Self {
            command_chat_id: sender_id.clone(),
            sender_id,
            sender_name: sender_name.into(),
            message: message.filter(|m| !m.trim().is_empty()),
            command_message_id,
        }
    }

    /// Sets the chat the command was sent in, e.g. a group.
    pub fn in_chat(mut self, chat_id: impl Into<String>) -> Self {
        self.command_chat_id = chat_id.into();
        self
    }
}

/// Result of a single wake attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum WakeOutcome {
    NotFound { target: String },
    CooldownActive { target: String, remaining: Duration },
    AlreadyTracking { target: String },
    NoDestination { target: String },
    DeliveryFailed { target: String },
    Woken { target: String },
    DirectoryUnavailable,
}

impl WakeOutcome {
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeOutcome::Woken { .. })
    }

    /// Refused before anything was sent.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            WakeOutcome::CooldownActive { .. }
                | WakeOutcome::AlreadyTracking { .. }
                | WakeOutcome::NoDestination { .. }
        )
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WakeOutcome::Woken { .. } => "✅",
            WakeOutcome::AlreadyTracking { .. } => "🔨",
            WakeOutcome::CooldownActive { .. } => "⏳",
            _ => "⚠️",
        }
    }
}

impl fmt::Display for WakeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WakeOutcome::NotFound { target } => write!(f, "User '{}' not found.", target),
            WakeOutcome::CooldownActive { target, remaining } => write!(
                f,
                "Wait {} before waking {} again.",
                format_remaining(*remaining),
                capitalize(target)
            ),
            WakeOutcome::AlreadyTracking { target } => {
                write!(f, "{} is already studying!", capitalize(target))
            }
            WakeOutcome::NoDestination { target } => {
                write!(f, "{} has no Telegram chat to send to.", capitalize(target))
            }
            WakeOutcome::DeliveryFailed { target } => {
                write!(f, "Failed to send message to {}.", capitalize(target))
            }
            WakeOutcome::Woken { target } => write!(f, "Successfully woke {}! 🔔", capitalize(target)),
            WakeOutcome::DirectoryUnavailable => {
                write!(f, "System error: the user directory is unavailable.")
            }
        }
    }
}

/// One line of a bulk wake.
#[derive(Debug, Clone, PartialEq)]
pub struct WakeAllEntry {
    pub name: String,
    pub outcome: WakeOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WakeAllReport {
    Completed(Vec<WakeAllEntry>),
    DirectoryUnavailable,
}

impl WakeAllReport {
    pub fn woken_count(&self) -> usize {
        match self {
            WakeAllReport::Completed(entries) => {
                entries.iter().filter(|e| e.outcome.is_woken()).count()
            }
            WakeAllReport::DirectoryUnavailable => 0,
        }
    }

    /// Renders the report as Telegram HTML.
    pub fn to_html(&self) -> String {
        let entries = match self {
            WakeAllReport::Completed(entries) => entries,
            WakeAllReport::DirectoryUnavailable => {
                return format!("⚠️ {}", escape_html(&WakeOutcome::DirectoryUnavailable.to_string()));
            }
        };

        if entries.is_empty() {
            return "📢 <b>Wake All Report</b>\n\nNobody is registered yet.".to_string();
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {}: {}",
                    entry.outcome.icon(),
                    escape_html(&capitalize(&entry.name)),
                    escape_html(&entry.outcome.to_string())
                )
            })
            .collect();

        format!("📢 <b>Wake All Report</b>\n\n{}", lines.join("\n"))
    }
}

/// Builds the nudge text. Both user-provided parts are escaped.
pub fn compose_wake_notification(sender_name: &str, custom_message: Option<&str>) -> String {
    let mut text = format!(
        "⏰ <b>WAKE UP!</b>\n\n{} is nudging you to start studying!",
        escape_html(sender_name)
    );

    if let Some(message) = custom_message.filter(|m| !m.trim().is_empty()) {
        text.push_str(&format!(
            "\n\n💬 Message:\n<blockquote>{}</blockquote>",
            escape_html(message)
        ));
    }

    text
}

pub struct WakeEngine {
    directory: Arc<dyn Directory>,
    events: Arc<dyn EventLog>,
    probe: Arc<dyn StatusProbe>,
    channel: Arc<dyn NotificationChannel>,
    cooldown: Duration,
}

impl WakeEngine {
    pub fn new(
        directory: Arc<dyn Directory>,
        events: Arc<dyn EventLog>,
        probe: Arc<dyn StatusProbe>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            directory,
            events,
            probe,
            channel,
            cooldown: Duration::minutes(DEFAULT_COOLDOWN_MINUTES),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Wakes one person, fetching the directory first.
    pub async fn request_wake(&self, request: &WakeRequest, target_name: &str) -> WakeOutcome {
        match self.directory.list_people().await {
            Ok(people) => self.wake_in(&people, request, target_name).await,
            Err(e) => {
                tracing::error!("Cannot read user directory for wake by {}: {}", request.sender_id, e);
                WakeOutcome::DirectoryUnavailable
            }
        }
    }

    /// Wakes one person out of an already fetched directory snapshot.
    pub async fn wake_in(
        &self,
        people: &[Person],
        request: &WakeRequest,
        target_name: &str,
    ) -> WakeOutcome {
        let outcome = self.decide_and_deliver(people, request, target_name).await;
        log_wake_decision(&request.sender_id, target_name, &outcome.to_string());
        outcome
    }

    /// Wakes everybody in the directory, one after another.
    pub async fn request_wake_all(&self, request: &WakeRequest) -> WakeAllReport {
        let people = match self.directory.list_people().await {
            Ok(people) => people,
            Err(e) => {
                tracing::error!("Cannot read user directory for wake-all by {}: {}", request.sender_id, e);
                return WakeAllReport::DirectoryUnavailable;
            }
        };

        let mut entries = Vec::with_capacity(people.len());
        for person in &people {
            let outcome = self.wake_in(&people, request, &person.name).await;
            entries.push(WakeAllEntry {
                name: person.name.clone(),
                outcome,
            });
        }

        WakeAllReport::Completed(entries)
    }

    async fn decide_and_deliver(
        &self,
        people: &[Person],
        request: &WakeRequest,
        target_name: &str,
    ) -> WakeOutcome {
        let target_key = target_name.trim().to_lowercase();
        let Some(target) = people.iter().find(|p| p.name.to_lowercase() == target_key) else {
            return WakeOutcome::NotFound {
                target: target_name.trim().to_string(),
            };
        };
        let name = target.name.clone();

        if let Some(remaining) = target.cooldowns.remaining(&request.sender_id, Utc::now()) {
            return WakeOutcome::CooldownActive { target: name, remaining };
        }

        if let Some(token) = target.tracking_token.as_deref() {
            if self.probe.is_tracking(token).await {
                return WakeOutcome::AlreadyTracking { target: name };
            }
        }

        let Some(chat_id) = target.chat_id.as_deref() else {
            return WakeOutcome::NoDestination { target: name };
        };

        let text = compose_wake_notification(&request.sender_name, request.message.as_deref());
        let message_id = match self.channel.send(chat_id, &text, None).await {
            Ok(message_id) => message_id,
            Err(e) => {
                tracing::warn!("Failed to deliver wake from {} to {}: {}", request.sender_id, name, e);
                return WakeOutcome::DeliveryFailed { target: name };
            }
        };

        // Delivered. Bookkeeping failures below are logged, not reported.
        match Utc::now().checked_add_signed(self.cooldown) {
            Some(expiry) => {
                let mut cooldowns = target.cooldowns.clone();
                cooldowns.set(request.sender_id.clone(), expiry);
                if let Err(e) = self.directory.update_cooldowns(&target.id, &cooldowns).await {
                    tracing::error!("Failed to store cooldown of {} on {}: {}", request.sender_id, name, e);
                }
            }
            None => tracing::error!(
                "Cooldown of {} minutes is out of range, not storing one for {} on {}",
                self.cooldown.num_minutes(),
                request.sender_id,
                name
            ),
        }

        let event = NewWakeEvent {
            sender: request.sender_id.clone(),
            receiver: chat_id.to_string(),
            notification_message_id: message_id,
            command_chat_id: request.command_chat_id.clone(),
            command_message_id: request.command_message_id,
        };
        if let Err(e) = self.events.record(event).await {
            tracing::error!("Failed to log wake of {} by {}: {}", name, request.sender_id, e);
        }

        WakeOutcome::Woken { target: name }
    }
}
