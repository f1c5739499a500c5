use std::fmt;

use time::OffsetDateTime;

use crate::time_utils::format_elapsed;
use crate::tracking::TrackingState;

/// Status glyph shown next to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleState {
    Idle,
    Tracking,
    Misconfigured,
}

impl TitleState {
    pub fn derive(configured: bool, state: &TrackingState) -> Self {
        if !configured {
            TitleState::Misconfigured
        } else if state.is_tracking() {
            TitleState::Tracking
        } else {
            TitleState::Idle
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TitleState::Idle => "⏱️",
            TitleState::Tracking => "⏱️ ▶️",
            TitleState::Misconfigured => "⏱️ ⚠️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Stop,
    AssignTask,
    Settings,
    Refresh,
    Quit,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Start => "▶️ Start Tracking",
            MenuAction::Stop => "⏸ Pause/Stop Tracking",
            MenuAction::AssignTask => "🎯 Assign Task",
            MenuAction::Settings => "⚙️ Settings",
            MenuAction::Refresh => "🔄 Refresh",
            MenuAction::Quit => "❌ Quit",
        }
    }

    /// Shell keyword that triggers the action.
    pub fn keyword(self) -> &'static str {
        match self {
            MenuAction::Start => "start",
            MenuAction::Stop => "stop",
            MenuAction::AssignTask => "assign",
            MenuAction::Settings => "settings",
            MenuAction::Refresh => "refresh",
            MenuAction::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Label(String),
    Action(MenuAction),
    Separator,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Label(text) => write!(f, "  {}", text),
            MenuItem::Action(action) => {
                write!(f, "  {:<24} ({})", action.label(), action.keyword())
            }
            MenuItem::Separator => write!(f, "  ────────────"),
        }
    }
}

/// The menu for the current state. Rebuilt after every operation; the
/// duration label is the only part that changes between operations.
pub fn menu_items(configured: bool, state: &TrackingState, now: OffsetDateTime) -> Vec<MenuItem> {
    let mut items = Vec::new();

    if state.is_tracking() {
        let name = state
            .assigned_task()
            .map(|task| task.name())
            .unwrap_or(crate::tracking::NO_TASK_NAME);
        items.push(MenuItem::Label(format!("Tracking: {}", name)));
        items.push(MenuItem::Label(duration_label(state, now)));
        items.push(MenuItem::Separator);
        items.push(MenuItem::Action(MenuAction::Stop));
    } else {
        items.push(MenuItem::Label("Status: Not Tracking".to_string()));
        if let Some(task) = state.armed_task() {
            items.push(MenuItem::Label(format!("Armed: {}", task.name())));
        }
        items.push(MenuItem::Separator);
        items.push(MenuItem::Action(MenuAction::Start));
    }

    items.push(MenuItem::Separator);
    items.push(MenuItem::Action(MenuAction::AssignTask));
    items.push(MenuItem::Separator);
    if !configured {
        items.push(MenuItem::Label(
            "Not configured: add your API token in settings".to_string(),
        ));
    }
    items.push(MenuItem::Action(MenuAction::Settings));
    items.push(MenuItem::Action(MenuAction::Refresh));
    items.push(MenuItem::Action(MenuAction::Quit));

    items
}

pub fn duration_label(state: &TrackingState, now: OffsetDateTime) -> String {
    format!("Duration: {}", format_elapsed(now, state.tracking_since()))
}
