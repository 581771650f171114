//! HTTP client for the production-planner REST API.
//!
//! All methods are async and run inside the store worker task. The four
//! collection endpoints are fetched together with an all-or-nothing
//! fan-out: a single failed GET fails the whole load.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::models::{Dataset, Phase, Project, Task, TaskDraft, TeamMember};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5501/api";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the specified base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// GET a whole collection as JSON.
    async fn get_collection<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {path} endpoint"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {path} response"))
    }

    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.get_collection("projects").await
    }

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.get_collection("tasks").await
    }

    pub async fn fetch_phases(&self) -> Result<Vec<Phase>> {
        self.get_collection("phases").await
    }

    pub async fn fetch_team_members(&self) -> Result<Vec<TeamMember>> {
        self.get_collection("team-members").await
    }

    /// Fetch all four collections concurrently. Partial success counts as
    /// total failure so the caller can fall through to the next tier.
    pub async fn fetch_dataset(&self) -> Result<Dataset> {
        let (projects, tasks, phases, team_members) = tokio::join!(
            self.fetch_projects(),
            self.fetch_tasks(),
            self.fetch_phases(),
            self.fetch_team_members()
        );

        Ok(Dataset {
            projects: projects?,
            tasks: tasks?,
            phases: phases?,
            team_members: team_members?,
        })
    }

    // ============================================
    // Task mutations
    // ============================================

    /// Create a new task. The server assigns the id and returns the
    /// stored record.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let url = format!("{}/tasks", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .context("Failed to send create task request")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse create task response")
    }

    /// Replace an existing task's fields.
    pub async fn update_task(&self, id: i64, draft: &TaskDraft) -> Result<Task> {
        let url = format!("{}/tasks/{}", self.base_url, id);

        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .context("Failed to send update task request")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse update task response")
    }

    /// Delete a task by id. The server returns no body.
    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let url = format!("{}/tasks/{}", self.base_url, id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send delete task request")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }

        Ok(())
    }
}
