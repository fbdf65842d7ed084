use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ProbeError;
use crate::services::traits::StatusProbe;

/// Toggl answers quickly or not at all; don't hold a wake up for longer.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// The subset of a Toggl time entry we care about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "pid")]
    pub project_id: Option<i64>,
    #[serde(default, alias = "wid")]
    pub workspace_id: Option<i64>,
    #[serde(default)]
    pub start: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    name: Option<String>,
}

/// Checks Toggl for a running time entry.
#[derive(Clone)]
pub struct TogglProbe {
    client: Client,
    base_url: String,
}

impl TogglProbe {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(PROBE_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, token: &str) -> Result<reqwest::Response, ProbeError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .basic_auth(token, Some("api_token"))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeError::Api { code: status.as_u16() });
        }
        Ok(response)
    }

    pub async fn fetch_current_entry(&self, token: &str) -> Result<Option<TimeEntry>, ProbeError> {
        let response = self.get("/me/time_entries/current", token).await?;
        Ok(response.json::<Option<TimeEntry>>().await?)
    }

    pub async fn fetch_project_name(
        &self,
        token: &str,
        workspace_id: i64,
        project_id: i64,
    ) -> Result<Option<String>, ProbeError> {
        let path = format!("/workspaces/{}/projects/{}", workspace_id, project_id);
        let response = self.get(&path, token).await?;
        let project = response.json::<Project>().await?;
        Ok(project.name.filter(|name| !name.trim().is_empty()))
    }
}

#[async_trait]
impl StatusProbe for TogglProbe {
    async fn current_entry(&self, token: &str) -> Result<Option<TimeEntry>, ProbeError> {
        self.fetch_current_entry(token).await
    }

    async fn project_name(
        &self,
        token: &str,
        workspace_id: i64,
        project_id: i64,
    ) -> Result<Option<String>, ProbeError> {
        self.fetch_project_name(token, workspace_id, project_id).await
    }
}
