use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::{
    domain::{List, Space, StartTimeEntryPayload, Task, Team, TimeEntry, User},
    ClickUpURL, Credentials,
};

const USER_AGENT: &str = concat!("clickup-tracker/", env!("CARGO_PKG_VERSION"));

/// Typed façade over the ClickUp REST API.
///
/// Every method is a single request: no retries, no caching and no local
/// state beyond the credentials it was built with.
#[derive(Debug, Clone)]
pub struct ClickUpClient {
    http: Client,
    base_url: ClickUpURL,
    credentials: Credentials,
}

impl ClickUpClient {
    pub fn new(credentials: Credentials) -> Result<Self, ClickUpError> {
        Self::with_base_url(credentials, ClickUpURL::default())
    }

    pub fn with_base_url(
        credentials: Credentials,
        base_url: ClickUpURL,
    ) -> Result<Self, ClickUpError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClickUpError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ClickUpError> {
        tracing::debug!(call = call_name, "Calling ClickUp");

        let resp = request
            .header(AUTHORIZATION, self.credentials.api_token())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ClickUpError::Transport(format!("{} failed: {}", call_name, e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(call = call_name, status = status.as_u16(), %body, "ClickUp rejected request");
            return Err(ClickUpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| {
            ClickUpError::Parsing(format!("Failed to parse {} response as JSON: {}", call_name, e))
        })
    }

    fn get(&self, url: ClickUpURL) -> RequestBuilder {
        self.http.get(url.as_ref())
    }

    fn post(&self, url: ClickUpURL) -> RequestBuilder {
        self.http.post(url.as_ref())
    }

    pub async fn get_authenticated_user(&self) -> Result<User, ClickUpError> {
        let url = self.base_url.append_path("user");
        let response: UserResponse = self.fetch(self.get(url), "GET /user").await?;
        Ok(response.user)
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, ClickUpError> {
        let url = self.base_url.append_path("team");
        let response: TeamsResponse = self.fetch(self.get(url), "GET /team").await?;
        Ok(response.teams.unwrap_or_default())
    }

    pub async fn list_spaces(&self, team_id: &str) -> Result<Vec<Space>, ClickUpError> {
        let team_id = require("team_id", team_id)?;
        let url = self
            .base_url
            .append_path("team")
            .append_segment(team_id)
            .append_path("space");
        let response: SpacesResponse = self
            .fetch(self.get(url), "GET /team/:team_id/space")
            .await?;
        Ok(response.spaces.unwrap_or_default())
    }

    pub async fn list_lists(&self, space_id: &str) -> Result<Vec<List>, ClickUpError> {
        let space_id = require("space_id", space_id)?;
        let url = self
            .base_url
            .append_path("space")
            .append_segment(space_id)
            .append_path("list");
        let response: ListsResponse = self
            .fetch(self.get(url), "GET /space/:space_id/list")
            .await?;
        Ok(response.lists.unwrap_or_default())
    }

    pub async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, ClickUpError> {
        let list_id = require("list_id", list_id)?;
        let url = self
            .base_url
            .append_path("list")
            .append_segment(list_id)
            .append_path("task");
        let response: TasksResponse = self
            .fetch(self.get(url), "GET /list/:list_id/task")
            .await?;
        Ok(response.tasks.unwrap_or_default())
    }

    /// The entry currently running for the token owner, if any.
    pub async fn get_running_time_entry(
        &self,
        team_id: &str,
    ) -> Result<Option<TimeEntry>, ClickUpError> {
        let team_id = require("team_id", team_id)?;
        let url = self
            .base_url
            .append_path("team")
            .append_segment(team_id)
            .append_path("time_entries/current");
        let response: DataResponse<TimeEntry> = self
            .fetch(self.get(url), "GET /team/:team_id/time_entries/current")
            .await?;
        Ok(response.data)
    }

    /// Start a timer. Fails if ClickUp already has one running; stopping it
    /// first is up to the caller.
    pub async fn start_time_entry(
        &self,
        team_id: &str,
        task_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<TimeEntry, ClickUpError> {
        let team_id = require("team_id", team_id)?;
        let task_id = task_id.map(str::trim).filter(|id| !id.is_empty());
        let url = self
            .base_url
            .append_path("team")
            .append_segment(team_id)
            .append_path("time_entries/start");
        let payload = StartTimeEntryPayload::new(task_id, description);

        let response: DataResponse<TimeEntry> = self
            .fetch(
                self.post(url).json(&payload),
                "POST /team/:team_id/time_entries/start",
            )
            .await?;
        response.into_data("POST /team/:team_id/time_entries/start")
    }

    pub async fn stop_time_entry(&self, team_id: &str) -> Result<TimeEntry, ClickUpError> {
        let team_id = require("team_id", team_id)?;
        let url = self
            .base_url
            .append_path("team")
            .append_segment(team_id)
            .append_path("time_entries/stop");

        let response: DataResponse<TimeEntry> = self
            .fetch(self.post(url), "POST /team/:team_id/time_entries/stop")
            .await?;
        response.into_data("POST /team/:team_id/time_entries/stop")
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, ClickUpError> {
        let task_id = require("task_id", task_id)?;
        let url = self.base_url.append_path("task").append_segment(task_id);
        self.fetch(self.get(url), "GET /task/:task_id").await
    }

    /// Matching is done entirely by ClickUp; an empty result is not an error.
    pub async fn search_tasks(&self, team_id: &str, query: &str) -> Result<Vec<Task>, ClickUpError> {
        let team_id = require("team_id", team_id)?;
        let url = self
            .base_url
            .append_path("team")
            .append_segment(team_id)
            .append_path("task");
        let response: TasksResponse = self
            .fetch(
                self.get(url).query(&[("search", query)]),
                "GET /team/:team_id/task",
            )
            .await?;
        Ok(response.tasks.unwrap_or_default())
    }
}

fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ClickUpError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClickUpError::MissingIdentifier(name))
    } else {
        Ok(value)
    }
}

#[derive(Error, Debug)]
pub enum ClickUpError {
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("RemoteError {status}: {body}")]
    Status { status: u16, body: String },
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("Missing identifier: {0}")]
    MissingIdentifier(&'static str),
}

impl ClickUpError {
    /// HTTP status of the rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClickUpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(401) | Some(403)
        )
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    teams: Option<Vec<Team>>,
}

#[derive(Debug, Deserialize)]
struct SpacesResponse {
    spaces: Option<Vec<Space>>,
}

#[derive(Debug, Deserialize)]
struct ListsResponse {
    lists: Option<Vec<List>>,
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    tasks: Option<Vec<Task>>,
}

/// Envelope used by the time entry endpoints.
#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: Option<T>,
}

impl<T> DataResponse<T> {
    fn into_data(self, call_name: &str) -> Result<T, ClickUpError> {
        self.data
            .ok_or_else(|| ClickUpError::Parsing(format!("{} response has no data", call_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collections_decode_as_empty() {
        let teams: TeamsResponse = serde_json::from_str("{}").unwrap();
        assert!(teams.teams.unwrap_or_default().is_empty());

        let spaces: SpacesResponse = serde_json::from_str("{}").unwrap();
        assert!(spaces.spaces.is_none());

        let lists: ListsResponse = serde_json::from_str("{}").unwrap();
        assert!(lists.lists.is_none());

        let tasks: TasksResponse = serde_json::from_str(r#"{"tasks":null}"#).unwrap();
        assert!(tasks.tasks.unwrap_or_default().is_empty());
    }

    #[test]
    fn null_data_means_nothing_running() {
        let response: DataResponse<TimeEntry> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(response.data.is_none());

        let response: DataResponse<TimeEntry> = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_none());
    }

    #[test]
    fn status_helpers() {
        let not_found = ClickUpError::Status {
            status: 404,
            body: r#"{"err":"Task not found"}"#.to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_unauthorized());

        let unauthorized = ClickUpError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(ClickUpError::Transport("down".into()).status(), None);
    }

    #[tokio::test]
    async fn blank_identifiers_fail_before_any_request() {
        let client = ClickUpClient::with_base_url(
            Credentials::new("pk_test").unwrap(),
            ClickUpURL::new("http://127.0.0.1:9"),
        )
        .unwrap();

        let err = client.get_task("  ").await.unwrap_err();
        assert!(matches!(err, ClickUpError::MissingIdentifier("task_id")));

        let err = client.stop_time_entry("").await.unwrap_err();
        assert!(matches!(err, ClickUpError::MissingIdentifier("team_id")));
    }
}
