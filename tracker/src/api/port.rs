use async_trait::async_trait;
use clickup::{
    ClickUpClient, ClickUpError, ClickUpURL, Credentials, List, Space, Task, Team, TimeEntry, User,
};

use crate::error::TrackerError;

/// Outbound port for the remote time tracking service.
///
/// Mirrors the ClickUp client one-to-one so the tracking logic can run
/// against the in-memory [`DevBackend`](super::DevBackend) as well.
#[async_trait]
pub trait TimeTrackingApi: Send + Sync {
    async fn get_authenticated_user(&self) -> Result<User, ClickUpError>;

    async fn list_teams(&self) -> Result<Vec<Team>, ClickUpError>;

    async fn list_spaces(&self, team_id: &str) -> Result<Vec<Space>, ClickUpError>;

    async fn list_lists(&self, space_id: &str) -> Result<Vec<List>, ClickUpError>;

    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, ClickUpError>;

    /// `None` when nothing is running. Safe to call at any time.
    async fn get_running_time_entry(&self, team_id: &str)
        -> Result<Option<TimeEntry>, ClickUpError>;

    async fn start_time_entry(
        &self,
        team_id: &str,
        task_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<TimeEntry, ClickUpError>;

    async fn stop_time_entry(&self, team_id: &str) -> Result<TimeEntry, ClickUpError>;

    async fn get_task(&self, task_id: &str) -> Result<Task, ClickUpError>;

    async fn search_tasks(&self, team_id: &str, query: &str) -> Result<Vec<Task>, ClickUpError>;
}

/// Builds an API handle from a freshly entered token.
pub trait Connect: TimeTrackingApi + Sized {
    fn connect(api_token: &str, base_url: Option<&str>) -> Result<Self, TrackerError>;
}

#[async_trait]
impl TimeTrackingApi for ClickUpClient {
    async fn get_authenticated_user(&self) -> Result<User, ClickUpError> {
        ClickUpClient::get_authenticated_user(self).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ClickUpError> {
        ClickUpClient::list_teams(self).await
    }

    async fn list_spaces(&self, team_id: &str) -> Result<Vec<Space>, ClickUpError> {
        ClickUpClient::list_spaces(self, team_id).await
    }

    async fn list_lists(&self, space_id: &str) -> Result<Vec<List>, ClickUpError> {
        ClickUpClient::list_lists(self, space_id).await
    }

    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, ClickUpError> {
        ClickUpClient::list_tasks(self, list_id).await
    }

    async fn get_running_time_entry(
        &self,
        team_id: &str,
    ) -> Result<Option<TimeEntry>, ClickUpError> {
        ClickUpClient::get_running_time_entry(self, team_id).await
    }

    async fn start_time_entry(
        &self,
        team_id: &str,
        task_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<TimeEntry, ClickUpError> {
        ClickUpClient::start_time_entry(self, team_id, task_id, description).await
    }

    async fn stop_time_entry(&self, team_id: &str) -> Result<TimeEntry, ClickUpError> {
        ClickUpClient::stop_time_entry(self, team_id).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, ClickUpError> {
        ClickUpClient::get_task(self, task_id).await
    }

    async fn search_tasks(&self, team_id: &str, query: &str) -> Result<Vec<Task>, ClickUpError> {
        ClickUpClient::search_tasks(self, team_id, query).await
    }
}

impl Connect for ClickUpClient {
    fn connect(api_token: &str, base_url: Option<&str>) -> Result<Self, TrackerError> {
        let credentials =
            Credentials::new(api_token).map_err(|e| TrackerError::Config(e.to_string()))?;
        let base_url = base_url.map(ClickUpURL::new).unwrap_or_default();
        Ok(ClickUpClient::with_base_url(credentials, base_url)?)
    }
}
