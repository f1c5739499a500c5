use std::fmt;

use clickup::Task;
use time::OffsetDateTime;

pub const UNKNOWN_TASK_NAME: &str = "Unknown Task";
pub const NO_TASK_NAME: &str = "No Task Assigned";

/// What the current or next interval is booked against.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignedTask {
    Task(Task),
    /// A timer runs (or will run) without any task attached.
    Unassigned,
}

impl AssignedTask {
    /// Stand-in for a task that is referenced remotely but could not be
    /// fetched.
    pub fn placeholder(task_id: &str) -> Self {
        AssignedTask::Task(Task::new(task_id, UNKNOWN_TASK_NAME))
    }

    pub fn name(&self) -> &str {
        match self {
            AssignedTask::Task(task) => &task.name,
            AssignedTask::Unassigned => NO_TASK_NAME,
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            AssignedTask::Task(task) => Some(task.id.as_str()),
            AssignedTask::Unassigned => None,
        }
    }
}

/// The single in-memory tracking state.
///
/// `tracking_since` is only ever set together with `assigned_task`, and
/// both are cleared together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingState {
    assigned_task: Option<AssignedTask>,
    tracking_since: Option<OffsetDateTime>,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned_task(&self) -> Option<&AssignedTask> {
        self.assigned_task.as_ref()
    }

    pub fn tracking_since(&self) -> Option<OffsetDateTime> {
        self.tracking_since
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking_since.is_some()
    }

    /// A task assigned while no timer is running.
    pub fn armed_task(&self) -> Option<&AssignedTask> {
        if self.is_tracking() {
            None
        } else {
            self.assigned_task.as_ref()
        }
    }

    pub(crate) fn clear(&mut self) {
        self.assigned_task = None;
        self.tracking_since = None;
    }

    pub(crate) fn track(&mut self, task: AssignedTask, since: OffsetDateTime) {
        self.assigned_task = Some(task);
        self.tracking_since = Some(since);
    }

    pub(crate) fn mark_started(&mut self, since: OffsetDateTime) {
        let task = self.assigned_task.take().unwrap_or(AssignedTask::Unassigned);
        self.track(task, since);
    }

    pub(crate) fn arm(&mut self, task: Task) {
        self.assigned_task = Some(AssignedTask::Task(task));
    }
}

/// A search hit offered back to the user for disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

impl From<&Task> for Candidate {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn starting_without_armed_task_uses_sentinel() {
        let mut state = TrackingState::new();
        state.mark_started(datetime!(2024-06-10 09:00:00 UTC));

        assert_eq!(state.assigned_task(), Some(&AssignedTask::Unassigned));
        assert_eq!(state.assigned_task().unwrap().name(), NO_TASK_NAME);
        assert!(state.is_tracking());
    }

    #[test]
    fn starting_keeps_armed_task() {
        let mut state = TrackingState::new();
        state.arm(Task::new("1001", "Fix login redirect"));
        assert!(state.armed_task().is_some());

        state.mark_started(datetime!(2024-06-10 09:00:00 UTC));

        assert_eq!(state.assigned_task().unwrap().task_id(), Some("1001"));
        assert!(state.armed_task().is_none());
    }

    #[test]
    fn clear_resets_both_fields() {
        let mut state = TrackingState::new();
        state.track(
            AssignedTask::placeholder("42"),
            datetime!(2024-06-10 09:00:00 UTC),
        );

        state.clear();

        assert_eq!(state, TrackingState::default());
    }

    #[test]
    fn placeholder_keeps_the_id() {
        let placeholder = AssignedTask::placeholder("86a0xyz");
        assert_eq!(placeholder.name(), UNKNOWN_TASK_NAME);
        assert_eq!(placeholder.task_id(), Some("86a0xyz"));
    }

    #[test]
    fn candidate_display() {
        let candidate = Candidate::from(&Task::new("1002", "Write release notes"));
        assert_eq!(candidate.to_string(), "Write release notes (ID: 1002)");
    }
}
