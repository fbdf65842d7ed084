//! Narrow contracts the wake engine and reply router depend on.
//!
//! Production wiring uses [`DatabaseManager`](crate::database::connection::DatabaseManager)
//! for the directory and event log, [`TogglProbe`](crate::services::toggl::TogglProbe)
//! for tracking status and [`TelegramNotifier`](crate::services::notifier::TelegramNotifier)
//! for delivery. Tests swap in in-memory fakes.

use async_trait::async_trait;

use crate::database::models::{NewWakeEvent, Person, WakeEvent};
use crate::error::{DeliveryError, ProbeError, StoreError};
use crate::services::cooldown::Cooldowns;
use crate::services::toggl::TimeEntry;

/// Read and update access to the people directory.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn list_people(&self) -> Result<Vec<Person>, StoreError>;

    /// Replaces the stored cooldown map for one person.
    async fn update_cooldowns(&self, person_id: &str, cooldowns: &Cooldowns) -> Result<(), StoreError>;
}

/// Append-mostly log of delivered nudges.
#[async_trait]
pub trait EventLog: Send + Sync {
    async fn record(&self, event: NewWakeEvent) -> Result<WakeEvent, StoreError>;

    /// Message ids are only unique within a chat, so lookups are scoped to
    /// the chat the nudge was delivered to.
    async fn find_by_notification(
        &self,
        receiver: &str,
        message_id: i32,
    ) -> Result<Option<WakeEvent>, StoreError>;

    async fn mark_reply_used(&self, event_id: &str) -> Result<(), StoreError>;
}

/// Reads a person's time-tracking state.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// The running entry, or `None` when nothing is being tracked.
    async fn current_entry(&self, token: &str) -> Result<Option<TimeEntry>, ProbeError>;

    /// Resolves a project id to its display name, if the provider can.
    async fn project_name(
        &self,
        _token: &str,
        _workspace_id: i64,
        _project_id: i64,
    ) -> Result<Option<String>, ProbeError> {
        Ok(None)
    }

    /// Fails open: any error reads as "not tracking".
    async fn is_tracking(&self, token: &str) -> bool {
        match self.current_entry(token).await {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                tracing::warn!("Tracking status check failed, assuming not tracking: {}", e);
                false
            }
        }
    }
}

/// Delivers formatted (HTML) text and returns the provider's message id.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, DeliveryError>;
}
