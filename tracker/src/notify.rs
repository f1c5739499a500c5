use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime};

use crate::time_utils::format_elapsed;

/// Events worth telling the user about after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    TrackingStopped,
    TaskAssigned { name: String },
    /// Periodic nudge while a timer keeps running.
    TrackingReminder { elapsed: String },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::TrackingStopped => "Tracking Stopped",
            Notification::TaskAssigned { .. } => "Task Assigned",
            Notification::TrackingReminder { .. } => "Time Tracking Active",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::TrackingStopped => "Time entry has been saved to ClickUp".to_string(),
            Notification::TaskAssigned { name } => format!("Now tracking: {}", name),
            Notification::TrackingReminder { elapsed } => format!(
                "You've been tracking time for {}. Don't forget to stop when done!",
                elapsed
            ),
        }
    }
}

/// Fire-and-forget sink for notifications. Delivery problems never reach
/// the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(title = notification.title(), "{}", notification.body());
        println!("🔔 {}: {}", notification.title(), notification.body());
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}

/// Decides when a running timer is due for a reminder.
///
/// Reminders fire each time the elapsed time crosses another multiple of
/// the interval. A timer first seen mid-interval (e.g. restored at startup)
/// waits for the next multiple instead of firing right away.
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    interval: Option<Duration>,
    since: Option<OffsetDateTime>,
    fired: i64,
}

impl ReminderSchedule {
    /// `None` disables reminders.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|interval| interval.is_positive()),
            since: None,
            fired: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Called on every tick with the held `tracking_since`.
    pub fn due(
        &mut self,
        tracking_since: Option<OffsetDateTime>,
        now: OffsetDateTime,
    ) -> Option<Notification> {
        let interval = self.interval?;
        let Some(since) = tracking_since else {
            self.since = None;
            return None;
        };

        let intervals = ((now - since).whole_seconds() / interval.whole_seconds()).max(0);
        if self.since != Some(since) {
            self.since = Some(since);
            self.fired = intervals;
            return None;
        }
        if intervals <= self.fired {
            return None;
        }

        self.fired = intervals;
        Some(Notification::TrackingReminder {
            elapsed: format_elapsed(now, Some(since)),
        })
    }
}
