use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A delivered nudge, kept so the first reply to it can be routed back.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct WakeEvent {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub notification_message_id: i32,
    /// Chat the `/wake` command was sent in. `command_message_id` belongs to it.
    pub command_chat_id: String,
    pub command_message_id: i32,
    pub reply_used: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWakeEvent {
    pub sender: String,
    pub receiver: String,
    pub notification_message_id: i32,
    pub command_chat_id: String,
    pub command_message_id: i32,
}

impl WakeEvent {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        event: NewWakeEvent,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO wake_events (id, sender, receiver, notification_message_id, command_chat_id, command_message_id, reply_used, created_at)
            VALUES (?, ?, ?, ?, ?, ?, FALSE, ?)
            "#
        )
        .bind(&id)
        .bind(&event.sender)
        .bind(&event.receiver)
        .bind(event.notification_message_id)
        .bind(&event.command_chat_id)
        .bind(event.command_message_id)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(WakeEvent {
            id,
            sender: event.sender,
            receiver: event.receiver,
            notification_message_id: event.notification_message_id,
            command_chat_id: event.command_chat_id,
            command_message_id: event.command_message_id,
            reply_used: false,
            created_at: now,
        })
    }

    /// Most recent nudge delivered to `receiver` as message `message_id`.
    pub async fn find_by_notification(
        pool: &sqlx::SqlitePool,
        receiver: &str,
        message_id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, WakeEvent>(
            "SELECT id, sender, receiver, notification_message_id, command_chat_id, command_message_id, reply_used, created_at
             FROM wake_events
             WHERE receiver = ? AND notification_message_id = ?
             ORDER BY created_at DESC
             LIMIT 1"
        )
        .bind(receiver)
        .bind(message_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_sender(
        pool: &sqlx::SqlitePool,
        sender: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, WakeEvent>(
            "SELECT id, sender, receiver, notification_message_id, command_chat_id, command_message_id, reply_used, created_at
             FROM wake_events WHERE sender = ? ORDER BY created_at"
        )
        .bind(sender)
        .fetch_all(pool)
        .await
    }

    /// Returns false when no event has this id.
    pub async fn mark_reply_used(
        pool: &sqlx::SqlitePool,
        event_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE wake_events SET reply_used = TRUE WHERE id = ?")
            .bind(event_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
