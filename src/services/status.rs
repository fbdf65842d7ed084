//! Who is tracking time right now.
//!
//! Unlike the wake path, a probe error here is reported as "unknown" rather
//! than read as "not tracking".

use std::sync::Arc;

use crate::database::models::Person;
use crate::error::StoreError;
use crate::services::traits::{Directory, StatusProbe};
use crate::utils::html::{capitalize, escape_html};

const UNKNOWN_PROJECT: &str = "Unknown Project";
const NO_DESCRIPTION: &str = "(No Description)";

#[derive(Debug, Clone, PartialEq)]
pub enum TrackingStatus {
    Tracking {
        description: Option<String>,
        project: Option<String>,
    },
    Idle,
    NoToken,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonStatus {
    pub name: String,
    pub status: TrackingStatus,
}

impl PersonStatus {
    pub fn to_html(&self) -> String {
        format_status(&self.name, &self.status)
    }
}

/// One status line as Telegram HTML.
pub fn format_status(name: &str, status: &TrackingStatus) -> String {
    let name = escape_html(&capitalize(name));
    match status {
        TrackingStatus::Tracking { description, project } => {
            let project = project
                .as_deref()
                .map(|p| format!("[{}] ", escape_html(p)))
                .unwrap_or_default();
            let description = description.as_deref().unwrap_or(NO_DESCRIPTION);
            format!(
                "🟢 {} is currently tracking: {}{}",
                name,
                project,
                escape_html(description)
            )
        }
        TrackingStatus::Idle => format!("🔴 {} is currently NOT tracking time.", name),
        TrackingStatus::NoToken => format!("⚪ {} has no Toggl account linked.", name),
        TrackingStatus::Unknown => format!("❓ {}'s tracking status is unknown right now.", name),
    }
}

pub fn format_status_report(statuses: &[PersonStatus]) -> String {
    if statuses.is_empty() {
        return "📊 <b>Tracking Status</b>\n\nNobody is registered yet.".to_string();
    }

    let lines: Vec<String> = statuses.iter().map(PersonStatus::to_html).collect();
    format!("📊 <b>Tracking Status</b>\n\n{}", lines.join("\n"))
}

pub struct StatusChecker {
    directory: Arc<dyn Directory>,
    probe: Arc<dyn StatusProbe>,
}

impl StatusChecker {
    pub fn new(directory: Arc<dyn Directory>, probe: Arc<dyn StatusProbe>) -> Self {
        Self { directory, probe }
    }

    /// `None` when nobody has that name.
    pub async fn status_of(&self, target_name: &str) -> Result<Option<PersonStatus>, StoreError> {
        let people = self.directory.list_people().await?;
        let key = target_name.trim().to_lowercase();

        match people.iter().find(|p| p.name.to_lowercase() == key) {
            Some(person) => Ok(Some(self.check(person).await)),
            None => Ok(None),
        }
    }

    pub async fn status_of_everyone(&self) -> Result<Vec<PersonStatus>, StoreError> {
        let people = self.directory.list_people().await?;

        let mut statuses = Vec::with_capacity(people.len());
        for person in &people {
            statuses.push(self.check(person).await);
        }
        Ok(statuses)
    }

    async fn check(&self, person: &Person) -> PersonStatus {
        PersonStatus {
            name: person.name.clone(),
            status: self.tracking_status(person).await,
        }
    }

    async fn tracking_status(&self, person: &Person) -> TrackingStatus {
        let Some(token) = person.tracking_token.as_deref() else {
            return TrackingStatus::NoToken;
        };

        let entry = match self.probe.current_entry(token).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return TrackingStatus::Idle,
            Err(e) => {
                tracing::warn!("Status check for {} failed: {}", person.name, e);
                return TrackingStatus::Unknown;
            }
        };

        let project = match (entry.workspace_id, entry.project_id) {
            (Some(workspace_id), Some(project_id)) => {
                let name = match self.probe.project_name(token, workspace_id, project_id).await {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::debug!("Project lookup {} for {} failed: {}", project_id, person.name, e);
                        None
                    }
                };
                Some(name.unwrap_or_else(|| UNKNOWN_PROJECT.to_string()))
            }
            _ => None,
        };

        TrackingStatus::Tracking {
            description: entry.description.filter(|d| !d.trim().is_empty()),
            project,
        }
    }
}
