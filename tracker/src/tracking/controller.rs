use clickup::{ClickUpError, Task, TimeEntry};
use time::OffsetDateTime;

use super::{resolve_task, AssignedTask, ResolveMode, Resolution, TrackingState};
use crate::{api::TimeTrackingApi, error::TrackerError, time_utils};

/// An API handle plus the workspace all time entries belong to.
#[derive(Debug, Clone)]
pub struct Session<A> {
    api: A,
    team_id: String,
}

/// What a reconciliation found remotely.
#[derive(Debug)]
pub enum Reconciliation {
    Idle,
    Running {
        since: OffsetDateTime,
        task: TaskLookup,
    },
}

/// How the task of a running entry was resolved during reconciliation.
#[derive(Debug)]
pub enum TaskLookup {
    Fetched,
    /// The entry names a task that could not be fetched; a placeholder was
    /// used instead.
    Placeholder(ClickUpError),
    Unassigned,
}

/// Drives every transition of [`TrackingState`].
///
/// The controller owns no tracking state itself: callers pass the state in,
/// so each operation reads as `(state, input) -> (state', result)`. On error
/// the state is left exactly as it was.
#[derive(Debug, Clone)]
pub struct Controller<A> {
    session: Option<Session<A>>,
}

impl<A: TimeTrackingApi> Controller<A> {
    pub fn new(api: A, team_id: impl Into<String>) -> Self {
        Self::from_parts(Some(api), Some(team_id.into()))
    }

    pub fn unconfigured() -> Self {
        Self { session: None }
    }

    /// Configured only when both an API handle and a non-blank team id are
    /// available.
    pub fn from_parts(api: Option<A>, team_id: Option<String>) -> Self {
        let team_id = team_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        let session = match (api, team_id) {
            (Some(api), Some(team_id)) => Some(Session { api, team_id }),
            _ => None,
        };
        Self { session }
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    pub fn api(&self) -> Option<&A> {
        self.session.as_ref().map(|session| &session.api)
    }

    pub fn team_id(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.team_id.as_str())
    }

    fn session(&self) -> Result<&Session<A>, TrackerError> {
        self.session.as_ref().ok_or(TrackerError::NotConfigured)
    }

    /// Rebuild `state` from the entry currently running in ClickUp.
    ///
    /// If the running entry cannot be read the state is left untouched: an
    /// unreachable service does not mean nothing is running.
    pub async fn reconcile(
        &self,
        state: &mut TrackingState,
    ) -> Result<Reconciliation, TrackerError> {
        let session = self.session()?;
        let Some(entry) = session.api.get_running_time_entry(&session.team_id).await? else {
            state.clear();
            tracing::info!("No running time entry");
            return Ok(Reconciliation::Idle);
        };

        let since = time_utils::from_epoch_millis(entry.start).ok_or_else(|| {
            ClickUpError::Parsing(format!("Invalid start timestamp {}", entry.start))
        })?;

        let (assigned, lookup) = match entry.task_id() {
            Some(task_id) => match session.api.get_task(task_id).await {
                Ok(task) => (AssignedTask::Task(task), TaskLookup::Fetched),
                Err(e) => {
                    tracing::warn!(task_id, error = %e, "Could not fetch task of running entry");
                    (AssignedTask::placeholder(task_id), TaskLookup::Placeholder(e))
                }
            },
            None => (AssignedTask::Unassigned, TaskLookup::Unassigned),
        };

        tracing::info!(entry_id = %entry.id, task = assigned.name(), "Found running time entry");
        state.track(assigned, since);
        Ok(Reconciliation::Running {
            since,
            task: lookup,
        })
    }

    /// Start a timer for the armed task, or for no task.
    ///
    /// `tracking_since` is the local clock at the moment the start succeeded,
    /// not the start time ClickUp echoes back.
    pub async fn start(&self, state: &mut TrackingState) -> Result<TimeEntry, TrackerError> {
        let session = self.session()?;
        let task_id = state
            .assigned_task()
            .and_then(AssignedTask::task_id)
            .map(str::to_string);

        let entry = session
            .api
            .start_time_entry(&session.team_id, task_id.as_deref(), None)
            .await?;

        state.mark_started(time_utils::now_local());
        tracing::info!(
            entry_id = %entry.id,
            task = state.assigned_task().map(AssignedTask::name),
            "Started tracking"
        );
        Ok(entry)
    }

    /// Stop the running timer. Always forgets the assigned task as well.
    pub async fn stop(&self, state: &mut TrackingState) -> Result<TimeEntry, TrackerError> {
        let session = self.session()?;
        let entry = session.api.stop_time_entry(&session.team_id).await?;

        state.clear();
        tracing::info!(entry_id = %entry.id, "Stopped tracking");
        Ok(entry)
    }

    /// Resolve `query` and arm the result for the next interval.
    ///
    /// A blank query does nothing. Assigning while a timer runs only changes
    /// the local label; the running entry is not touched.
    pub async fn assign(
        &self,
        state: &mut TrackingState,
        query: &str,
        mode: ResolveMode,
    ) -> Result<Option<Resolution>, TrackerError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let session = self.session()?;
        let resolution = resolve_task(&session.api, &session.team_id, query, mode).await?;

        state.arm(resolution.task().clone());
        tracing::info!(task_id = %resolution.task().id, task = %resolution.task().name, "Assigned task");
        Ok(Some(resolution))
    }

    /// Pick one of the candidates of an ambiguous match by id.
    pub async fn select_task(
        &self,
        state: &mut TrackingState,
        task_id: &str,
    ) -> Result<Option<Task>, TrackerError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Ok(None);
        }

        let session = self.session()?;
        let task = session.api.get_task(task_id).await?;

        state.arm(task.clone());
        tracing::info!(task_id = %task.id, task = %task.name, "Assigned task");
        Ok(Some(task))
    }
}
