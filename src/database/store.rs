use async_trait::async_trait;

use crate::database::connection::DatabaseManager;
use crate::database::models::{NewWakeEvent, Person, WakeEvent};
use crate::error::StoreError;
use crate::services::cooldown::Cooldowns;
use crate::services::traits::{Directory, EventLog};
use crate::utils::logging::{log_database_error, log_database_operation};

#[async_trait]
impl Directory for DatabaseManager {
    async fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        log_database_operation("SELECT", "people", None);
        Person::find_all(&self.pool).await.map_err(|e| {
            log_database_error("SELECT", "people", &e.to_string(), None);
            StoreError::from(e)
        })
    }

    async fn update_cooldowns(&self, person_id: &str, cooldowns: &Cooldowns) -> Result<(), StoreError> {
        let details = format!("person {}", person_id);
        log_database_operation("UPDATE", "people", Some(&details));
        Person::update_cooldowns(&self.pool, person_id, cooldowns)
            .await
            .map_err(|e| {
                log_database_error("UPDATE", "people", &e.to_string(), Some(&details));
                StoreError::from(e)
            })
    }
}

#[async_trait]
impl EventLog for DatabaseManager {
    async fn record(&self, event: NewWakeEvent) -> Result<WakeEvent, StoreError> {
        let details = format!(
            "{} -> {} (message {})",
            event.sender, event.receiver, event.notification_message_id
        );
        log_database_operation("INSERT", "wake_events", Some(&details));
        WakeEvent::create(&self.pool, event).await.map_err(|e| {
            log_database_error("INSERT", "wake_events", &e.to_string(), Some(&details));
            StoreError::from(e)
        })
    }

    async fn find_by_notification(
        &self,
        receiver: &str,
        message_id: i32,
    ) -> Result<Option<WakeEvent>, StoreError> {
        let details = format!("receiver {} message {}", receiver, message_id);
        log_database_operation("SELECT", "wake_events", Some(&details));
        WakeEvent::find_by_notification(&self.pool, receiver, message_id)
            .await
            .map_err(|e| {
                log_database_error("SELECT", "wake_events", &e.to_string(), Some(&details));
                StoreError::from(e)
            })
    }

    async fn mark_reply_used(&self, event_id: &str) -> Result<(), StoreError> {
        let details = format!("event {}", event_id);
        log_database_operation("UPDATE", "wake_events", Some(&details));
        match WakeEvent::mark_reply_used(&self.pool, event_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::EventNotFound(event_id.to_string())),
            Err(e) => {
                log_database_error("UPDATE", "wake_events", &e.to_string(), Some(&details));
                Err(StoreError::from(e))
            }
        }
    }
}
