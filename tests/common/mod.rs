//! In-memory stand-ins for the directory, wake log, status probe and
//! notification channel.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use nudge_bot::database::models::{NewWakeEvent, Person, WakeEvent};
use nudge_bot::error::{DeliveryError, ProbeError, StoreError};
use nudge_bot::services::cooldown::Cooldowns;
use nudge_bot::services::reply_router::ReplyRouter;
use nudge_bot::services::status::StatusChecker;
use nudge_bot::services::toggl::TimeEntry;
use nudge_bot::services::traits::{Directory, EventLog, NotificationChannel, StatusProbe};
use nudge_bot::services::wake::WakeEngine;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn person(name: &str, chat_id: Option<&str>, token: Option<&str>) -> Person {
    Person {
        id: format!("id-{}", name.to_lowercase()),
        name: name.to_string(),
        chat_id: chat_id.map(str::to_string),
        tracking_token: token.map(str::to_string),
        cooldowns: Cooldowns::new(),
        created_at: Utc::now().to_rfc3339(),
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    pub people: Mutex<Vec<Person>>,
    pub cooldown_writes: Mutex<Vec<(String, Cooldowns)>>,
    pub list_calls: AtomicUsize,
    pub unavailable: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeDirectory {
    pub fn with_people(people: Vec<Person>) -> Self {
        Self {
            people: Mutex::new(people),
            ..Default::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.cooldown_writes.lock().unwrap().len()
    }

    pub fn cooldowns_of(&self, name: &str) -> Cooldowns {
        self.people
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.cooldowns.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.people.lock().unwrap().clone())
    }

    async fn update_cooldowns(&self, person_id: &str, cooldowns: &Cooldowns) -> Result<(), StoreError> {
        self.cooldown_writes
            .lock()
            .unwrap()
            .push((person_id.to_string(), cooldowns.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        if let Some(p) = self.people.lock().unwrap().iter_mut().find(|p| p.id == person_id) {
            p.cooldowns = cooldowns.clone();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeEventLog {
    pub events: Mutex<Vec<WakeEvent>>,
    pub fail_record: AtomicBool,
    pub fail_mark: AtomicBool,
    pub fail_lookup: AtomicBool,
}

impl FakeEventLog {
    pub fn all(&self) -> Vec<WakeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn seed(&self, event: NewWakeEvent) -> WakeEvent {
        let mut events = self.events.lock().unwrap();
        let stored = WakeEvent {
            id: format!("event-{}", events.len() + 1),
            sender: event.sender,
            receiver: event.receiver,
            notification_message_id: event.notification_message_id,
            command_chat_id: event.command_chat_id,
            command_message_id: event.command_message_id,
            reply_used: false,
            created_at: Utc::now().to_rfc3339(),
        };
        events.push(stored.clone());
        stored
    }
}

#[async_trait]
impl EventLog for FakeEventLog {
    async fn record(&self, event: NewWakeEvent) -> Result<WakeEvent, StoreError> {
        if self.fail_record.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.seed(event))
    }

    async fn find_by_notification(
        &self,
        receiver: &str,
        message_id: i32,
    ) -> Result<Option<WakeEvent>, StoreError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.receiver == receiver && e.notification_message_id == message_id)
            .cloned())
    }

    async fn mark_reply_used(&self, event_id: &str) -> Result<(), StoreError> {
        if self.fail_mark.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.reply_used = true;
                Ok(())
            }
            None => Err(StoreError::EventNotFound(event_id.to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeProbe {
    pub entries: Mutex<HashMap<String, TimeEntry>>,
    pub failing_tokens: Mutex<HashSet<String>>,
    pub projects: Mutex<HashMap<i64, String>>,
    pub calls: AtomicUsize,
}

impl FakeProbe {
    pub fn tracking(tokens: &[&str]) -> Self {
        let probe = Self::default();
        for token in tokens {
            probe.set_entry(token, time_entry(None, None));
        }
        probe
    }

    pub fn set_entry(&self, token: &str, entry: TimeEntry) {
        self.entries.lock().unwrap().insert(token.to_string(), entry);
    }

    pub fn fail_for(&self, token: &str) {
        self.failing_tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn add_project(&self, project_id: i64, name: &str) {
        self.projects.lock().unwrap().insert(project_id, name.to_string());
    }
}

/// A running entry, in workspace 1 when it has a project.
pub fn time_entry(description: Option<&str>, project_id: Option<i64>) -> TimeEntry {
    TimeEntry {
        id: 1,
        description: description.map(str::to_string),
        project_id,
        workspace_id: project_id.map(|_| 1),
        start: Some("2026-10-17T08:00:00Z".to_string()),
    }
}

#[async_trait]
impl StatusProbe for FakeProbe {
    async fn current_entry(&self, token: &str) -> Result<Option<TimeEntry>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_tokens.lock().unwrap().contains(token) {
            return Err(ProbeError::Api { code: 503 });
        }
        Ok(self.entries.lock().unwrap().get(token).cloned())
    }

    async fn project_name(
        &self,
        _token: &str,
        _workspace_id: i64,
        project_id: i64,
    ) -> Result<Option<String>, ProbeError> {
        Ok(self.projects.lock().unwrap().get(&project_id).cloned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub reply_to: Option<i32>,
    pub message_id: i32,
}

pub struct FakeChannel {
    pub sent: Mutex<Vec<SentMessage>>,
    pub next_id: AtomicI32,
    pub fail: AtomicBool,
}

impl Default for FakeChannel {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(100),
            fail: AtomicBool::new(false),
        }
    }
}

impl FakeChannel {
    pub fn all(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for FakeChannel {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        reply_to: Option<i32>,
    ) -> Result<i32, DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Timeout(10));
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            reply_to,
            message_id,
        });
        Ok(message_id)
    }
}

/// All four fakes wired together.
pub struct Harness {
    pub directory: Arc<FakeDirectory>,
    pub events: Arc<FakeEventLog>,
    pub probe: Arc<FakeProbe>,
    pub channel: Arc<FakeChannel>,
}

impl Harness {
    pub fn new(people: Vec<Person>) -> Self {
        Self::with_probe(people, FakeProbe::default())
    }

    pub fn with_probe(people: Vec<Person>, probe: FakeProbe) -> Self {
        Self {
            directory: Arc::new(FakeDirectory::with_people(people)),
            events: Arc::new(FakeEventLog::default()),
            probe: Arc::new(probe),
            channel: Arc::new(FakeChannel::default()),
        }
    }

    pub fn engine(&self) -> WakeEngine {
        WakeEngine::new(
            self.directory.clone(),
            self.events.clone(),
            self.probe.clone(),
            self.channel.clone(),
        )
    }

    pub fn router(&self) -> ReplyRouter {
        ReplyRouter::new(self.events.clone(), self.channel.clone())
    }

    pub fn status_checker(&self) -> StatusChecker {
        StatusChecker::new(self.directory.clone(), self.probe.clone())
    }

    /// Cooldown writes plus wake log inserts.
    pub fn write_count(&self) -> usize {
        self.directory.write_count() + self.events.all().len()
    }
}
