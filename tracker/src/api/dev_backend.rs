use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clickup::{ClickUpError, List, Space, Task, TaskRef, Team, TimeEntry, User};
use time::OffsetDateTime;

use super::port::{Connect, TimeTrackingApi};
use crate::error::TrackerError;

/// In-memory stand-in for ClickUp.
///
/// Backs the `dev` command and the test suite. Clones share the same store,
/// so a test can keep a handle for inspection after handing one to a
/// controller.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug, Default)]
struct DevStore {
    teams: Vec<Team>,
    spaces: Vec<(String, Space)>,
    lists: Vec<(String, List)>,
    tasks: Vec<(String, Task)>,
    running: Option<TimeEntry>,
    next_entry_id: u64,
    search_results: Option<Vec<Task>>,
    unreachable: bool,
    broken_task_lookup: bool,
    calls: Vec<&'static str>,
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    /// A workspace seeded with a handful of tasks.
    pub fn new() -> Self {
        let backend = Self::empty();
        {
            let mut store = backend.lock();
            store.teams = vec![Team {
                id: "9001".to_string(),
                name: "Dev Workspace".to_string(),
            }];
            store.spaces = vec![(
                "9001".to_string(),
                Space {
                    id: "s1".to_string(),
                    name: "Engineering".to_string(),
                },
            )];
            store.lists = vec![(
                "s1".to_string(),
                List {
                    id: "l1".to_string(),
                    name: "Sprint 42".to_string(),
                },
            )];
            store.tasks = seed_dev_tasks()
                .into_iter()
                .map(|task| ("l1".to_string(), task))
                .collect();
        }
        backend
    }

    /// No teams, no tasks, nothing running.
    pub fn empty() -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore::default())),
        }
    }

    pub fn with_teams(self, teams: Vec<Team>) -> Self {
        self.lock().teams = teams;
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.lock().tasks = tasks
            .into_iter()
            .map(|task| ("l1".to_string(), task))
            .collect();
        self
    }

    pub fn with_running(self, entry: TimeEntry) -> Self {
        self.lock().running = Some(entry);
        self
    }

    /// Return these tasks from every search instead of matching by name.
    pub fn with_search_results(self, tasks: Vec<Task>) -> Self {
        self.lock().search_results = Some(tasks);
        self
    }

    /// Fail every call as if the network were down.
    pub fn unreachable(self) -> Self {
        self.set_unreachable(true);
        self
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Fail every task lookup with a server error.
    pub fn with_broken_task_lookup(self) -> Self {
        self.lock().broken_task_lookup = true;
        self
    }

    /// How many times the named operation was called.
    pub fn calls(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn running(&self) -> Option<TimeEntry> {
        self.lock().running.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DevStore> {
        self.store.lock().expect("dev store lock poisoned")
    }

    fn begin(&self, operation: &'static str) -> Result<std::sync::MutexGuard<'_, DevStore>, ClickUpError> {
        let mut store = self.lock();
        store.calls.push(operation);
        if store.unreachable {
            return Err(ClickUpError::Transport(format!(
                "{} failed: connection refused",
                operation
            )));
        }
        Ok(store)
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

fn rejected(status: u16, err: &str, code: &str) -> ClickUpError {
    ClickUpError::Status {
        status,
        body: serde_json::json!({ "err": err, "ECODE": code }).to_string(),
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[async_trait]
impl TimeTrackingApi for DevBackend {
    async fn get_authenticated_user(&self) -> Result<User, ClickUpError> {
        self.begin("get_authenticated_user")?;
        Ok(User {
            id: 1,
            username: Some("Dev User".to_string()),
            email: Some("dev@localhost".to_string()),
        })
    }

    async fn list_teams(&self) -> Result<Vec<Team>, ClickUpError> {
        let store = self.begin("list_teams")?;
        Ok(store.teams.clone())
    }

    async fn list_spaces(&self, team_id: &str) -> Result<Vec<Space>, ClickUpError> {
        let store = self.begin("list_spaces")?;
        let team_id = require("team_id", team_id)?;
        Ok(store
            .spaces
            .iter()
            .filter(|(parent, _)| parent == team_id)
            .map(|(_, space)| space.clone())
            .collect())
    }

    async fn list_lists(&self, space_id: &str) -> Result<Vec<List>, ClickUpError> {
        let store = self.begin("list_lists")?;
        let space_id = require("space_id", space_id)?;
        Ok(store
            .lists
            .iter()
            .filter(|(parent, _)| parent == space_id)
            .map(|(_, list)| list.clone())
            .collect())
    }

    async fn list_tasks(&self, list_id: &str) -> Result<Vec<Task>, ClickUpError> {
        let store = self.begin("list_tasks")?;
        let list_id = require("list_id", list_id)?;
        Ok(store
            .tasks
            .iter()
            .filter(|(parent, _)| parent == list_id)
            .map(|(_, task)| task.clone())
            .collect())
    }

    async fn get_running_time_entry(
        &self,
        team_id: &str,
    ) -> Result<Option<TimeEntry>, ClickUpError> {
        let store = self.begin("get_running_time_entry")?;
        require("team_id", team_id)?;
        Ok(store.running.clone())
    }

    async fn start_time_entry(
        &self,
        team_id: &str,
        task_id: Option<&str>,
        description: Option<&str>,
    ) -> Result<TimeEntry, ClickUpError> {
        let mut store = self.begin("start_time_entry")?;
        require("team_id", team_id)?;
        if store.running.is_some() {
            return Err(rejected(400, "Timer already running", "TIMEENTRY_054"));
        }

        store.next_entry_id += 1;
        let start = now_millis();
        let task = task_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| TaskRef {
                id: id.to_string(),
                name: store
                    .tasks
                    .iter()
                    .find(|(_, task)| task.id == id)
                    .map(|(_, task)| task.name.clone()),
            });
        let entry = TimeEntry {
            id: format!("dev-{}", store.next_entry_id),
            start,
            end: None,
            duration: Some(-start),
            task,
            description: Some(description.unwrap_or_default().to_string()),
            billable: false,
        };
        store.running = Some(entry.clone());
        Ok(entry)
    }

    async fn stop_time_entry(&self, team_id: &str) -> Result<TimeEntry, ClickUpError> {
        let mut store = self.begin("stop_time_entry")?;
        require("team_id", team_id)?;
        let mut entry = store
            .running
            .take()
            .ok_or_else(|| rejected(400, "No timer running", "TIMEENTRY_055"))?;
        let end = now_millis();
        entry.end = Some(end);
        entry.duration = Some(end - entry.start);
        Ok(entry)
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, ClickUpError> {
        let store = self.begin("get_task")?;
        let task_id = require("task_id", task_id)?;
        if store.broken_task_lookup {
            return Err(rejected(500, "Internal error", "ITEM_500"));
        }
        store
            .tasks
            .iter()
            .find(|(_, task)| task.id == task_id)
            .map(|(_, task)| task.clone())
            .ok_or_else(|| rejected(404, "Task not found", "ITEM_013"))
    }

    async fn search_tasks(&self, team_id: &str, query: &str) -> Result<Vec<Task>, ClickUpError> {
        let store = self.begin("search_tasks")?;
        require("team_id", team_id)?;
        if let Some(results) = &store.search_results {
            return Ok(results.clone());
        }

        let needle = query.to_lowercase();
        Ok(store
            .tasks
            .iter()
            .filter(|(_, task)| task.name.to_lowercase().contains(&needle))
            .map(|(_, task)| task.clone())
            .collect())
    }
}

impl Connect for DevBackend {
    fn connect(_api_token: &str, _base_url: Option<&str>) -> Result<Self, TrackerError> {
        Ok(Self::new())
    }
}

fn seed_dev_tasks() -> Vec<Task> {
    vec![
        Task::new("1001", "Fix login redirect"),
        Task::new("1002", "Write release notes"),
        Task::new("1003", "Review release branch"),
        Task::new("1004", "Release checklist"),
        Task::new("86a0xyz", "Plan Q3 roadmap"),
    ]
}
