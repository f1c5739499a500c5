use std::path::PathBuf;

use time::OffsetDateTime;

use super::commands::{Command, HELP};
use crate::api::Connect;
use crate::bootstrap;
use crate::browse;
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::notify::{Notification, Notifier, ReminderSchedule};
use crate::prompt::Prompt;
use crate::settings;
use crate::time_utils::{format_elapsed, now_local};
use crate::tracking::{Candidate, Controller, Reconciliation, ResolveMode, TrackingState};
use crate::view::{menu_items, TitleState};

const NOT_CONFIGURED: &str = "Please configure your ClickUp API token in Settings first.";
const QUIT_WHILE_TRACKING: &str = "You have an active timer. Are you sure you want to quit?";
const TOKEN_PROMPT: &str = "Enter your ClickUp API Token:\n(Get it from ClickUp Settings > Apps)";
const NOTHING_ASSIGNED: &str = "No task was assigned; the timer was not started.";

/// Everything the shell works on: the controller, the tracking state it
/// owns, and the dialogs around them.
pub struct App<A, P, N> {
    controller: Controller<A>,
    state: TrackingState,
    prompt: P,
    notifier: N,
    config: TrackerConfig,
    config_path: Option<PathBuf>,
    reminders: ReminderSchedule,
    running: bool,
}

impl<A, P, N> App<A, P, N>
where
    A: Connect,
    P: Prompt,
    N: Notifier,
{
    pub fn new(
        controller: Controller<A>,
        prompt: P,
        notifier: N,
        config: TrackerConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        let reminders = ReminderSchedule::new(config.reminder_interval());
        if !reminders.is_enabled() {
            tracing::debug!("Tracking reminders are off");
        }

        Self {
            controller,
            state: TrackingState::new(),
            prompt,
            notifier,
            reminders,
            config,
            config_path,
            running: true,
        }
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TrackingState {
        &mut self.state
    }

    pub fn controller(&self) -> &Controller<A> {
        &self.controller
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn prompt_mut(&mut self) -> &mut P {
        &mut self.prompt
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn title(&self) -> TitleState {
        TitleState::derive(self.controller.is_configured(), &self.state)
    }

    /// Run one command to completion. Failures are shown to the user before
    /// being returned.
    pub async fn run_command(&mut self, command: Command) -> Result<(), TrackerError> {
        tracing::debug!(command = command.name(), "Running command");
        match command {
            Command::Start => self.start().await,
            Command::Stop => self.stop().await,
            Command::Assign { query, mode } => self.assign(query, mode).await.map(|_| ()),
            Command::StartTask { query, mode } => self.start_task(query, mode).await,
            Command::Refresh => self.refresh().await,
            Command::Status => {
                self.render_menu();
                Ok(())
            }
            Command::Settings { token, team } => self.settings(token, team).await,
            Command::Browse => self.browse().await,
            Command::Help => {
                self.prompt.show(HELP);
                Ok(())
            }
            Command::Quit => {
                self.quit().await;
                Ok(())
            }
            Command::Unknown(word) => {
                self.prompt.show(&format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    word
                ));
                Ok(())
            }
        }
    }

    /// Pick up a timer that is already running in ClickUp.
    pub async fn initialize(&mut self) -> Option<Reconciliation> {
        bootstrap::initialize_tracking_state(&self.controller, &mut self.state).await
    }

    pub fn render_menu(&mut self) {
        let now = now_local();
        let mut lines = vec![self.status_line(now)];
        lines.extend(
            menu_items(self.controller.is_configured(), &self.state, now)
                .iter()
                .map(ToString::to_string),
        );
        self.prompt.show(&lines.join("\n"));
    }

    /// Refresh the elapsed time from held state only, and send a reminder
    /// each time another full interval of tracking has passed.
    pub fn tick(&mut self, now: OffsetDateTime) {
        let line = self.status_line(now);
        self.prompt.status(&line);
        if let Some(reminder) = self.reminders.due(self.state.tracking_since(), now) {
            self.notifier.notify(reminder);
        }
    }

    fn status_line(&self, now: OffsetDateTime) -> String {
        let title = self.title().title();
        if self.state.is_tracking() {
            format!("{} {}", title, format_elapsed(now, self.state.tracking_since()))
        } else {
            title.to_string()
        }
    }

    async fn start(&mut self) -> Result<(), TrackerError> {
        if !self.controller.is_configured() {
            self.prompt.alert("Error", NOT_CONFIGURED);
            return Err(TrackerError::NotConfigured);
        }

        match self.controller.start(&mut self.state).await {
            Ok(_) => {
                self.render_menu();
                Ok(())
            }
            Err(e) => {
                self.prompt
                    .alert("Error", &format!("Failed to start tracking: {}", e));
                Err(e)
            }
        }
    }

    async fn stop(&mut self) -> Result<(), TrackerError> {
        if !self.controller.is_configured() {
            self.prompt.alert("Error", NOT_CONFIGURED);
            return Err(TrackerError::NotConfigured);
        }

        match self.controller.stop(&mut self.state).await {
            Ok(_) => {
                self.render_menu();
                self.notifier.notify(Notification::TrackingStopped);
                Ok(())
            }
            Err(e) => {
                self.prompt
                    .alert("Error", &format!("Failed to stop tracking: {}", e));
                Err(e)
            }
        }
    }

    /// Assign then start, but only when a task actually got armed.
    async fn start_task(&mut self, query: String, mode: ResolveMode) -> Result<(), TrackerError> {
        if !self.assign(Some(query), mode).await? {
            self.prompt.alert("Error", NOTHING_ASSIGNED);
            return Err(TrackerError::NothingAssigned);
        }
        self.start().await
    }

    /// `Ok(true)` once a task is armed; `Ok(false)` when the user backed out.
    async fn assign(&mut self, query: Option<String>, mode: ResolveMode) -> Result<bool, TrackerError> {
        if !self.controller.is_configured() {
            self.prompt.alert("Error", NOT_CONFIGURED);
            return Err(TrackerError::NotConfigured);
        }

        let query = match query {
            Some(query) => query,
            None => match self
                .prompt
                .ask_line("Enter ClickUp Task ID or search term:", None)
                .await
            {
                Some(query) => query,
                None => return Ok(false),
            },
        };

        match self.controller.assign(&mut self.state, &query, mode).await {
            Ok(Some(resolution)) => {
                self.assigned(&resolution.task().name);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(TrackerError::NoMatch { .. }) => {
                self.prompt
                    .alert("No Results", "No tasks found matching your query.");
                Err(TrackerError::NoMatch { query })
            }
            Err(TrackerError::AmbiguousMatch { total, candidates, .. }) => {
                self.choose_candidate(total, candidates).await
            }
            Err(e) => {
                self.prompt
                    .alert("Error", &format!("Failed to assign task: {}", e));
                Err(e)
            }
        }
    }

    async fn choose_candidate(
        &mut self,
        total: usize,
        candidates: Vec<Candidate>,
    ) -> Result<bool, TrackerError> {
        let listing = candidates
            .iter()
            .map(|candidate| format!("  {}", candidate))
            .collect::<Vec<_>>()
            .join("\n");
        self.prompt.show(&listing);

        let default = candidates.first().map(|candidate| candidate.id.as_str());
        let Some(task_id) = self
            .prompt
            .ask_line(&format!("Found {} tasks. Enter task ID:", total), default)
            .await
        else {
            return Ok(false);
        };

        match self.controller.select_task(&mut self.state, &task_id).await {
            Ok(Some(task)) => {
                self.assigned(&task.name);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                self.prompt
                    .alert("Error", &format!("Failed to assign task: {}", e));
                Err(e)
            }
        }
    }

    fn assigned(&mut self, name: &str) {
        self.render_menu();
        self.notifier.notify(Notification::TaskAssigned {
            name: name.to_string(),
        });
    }

    async fn refresh(&mut self) -> Result<(), TrackerError> {
        let result = if self.controller.is_configured() {
            self.controller.reconcile(&mut self.state).await.map(|_| ())
        } else {
            Ok(())
        };

        if let Err(e) = &result {
            self.prompt
                .alert("Error", &format!("Failed to refresh: {}", e));
        }
        self.render_menu();
        result
    }

    async fn settings(
        &mut self,
        token: Option<String>,
        team: Option<String>,
    ) -> Result<(), TrackerError> {
        let token = match token {
            Some(token) => token,
            None => {
                let mut message = TOKEN_PROMPT.to_string();
                if let Some(credentials) = self.config.credentials() {
                    message.push_str(&format!("\n\nCurrent token: {}", credentials.masked()));
                }
                match self.prompt.ask_secret(&message).await {
                    Some(token) => token,
                    None => return Ok(()),
                }
            }
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(());
        }

        let api = match A::connect(&token, self.config.base_url()) {
            Ok(api) => api,
            Err(e) => return Err(self.settings_failed(e)),
        };
        let account = match settings::validate_token(&api, team.as_deref()).await {
            Ok(account) => account,
            Err(e) => return Err(self.settings_failed(e)),
        };

        let mut config = self.config.clone();
        settings::apply(&mut config, &token, &account);
        if let Some(path) = &self.config_path {
            if let Err(e) = config.save(path) {
                self.prompt.alert("Error", &e.to_string());
                return Err(e);
            }
        }
        self.config = config;

        self.controller = Controller::new(api, account.team.id.clone());
        self.state = TrackingState::new();
        if let Err(e) = self.controller.reconcile(&mut self.state).await {
            tracing::warn!(error = %e, "Could not check for a running timer");
        }

        self.prompt.alert(
            "Success",
            &format!(
                "Configuration saved successfully! Signed in as {} in {}.",
                account.user.display_name(),
                account.team.name
            ),
        );
        self.render_menu();
        Ok(())
    }

    fn settings_failed(&mut self, e: TrackerError) -> TrackerError {
        match &e {
            TrackerError::NoTeams => self.prompt.alert("Error", "No teams found for this account."),
            _ => self
                .prompt
                .alert("Error", &format!("Failed to validate API token: {}", e)),
        }
        e
    }

    async fn browse(&mut self) -> Result<(), TrackerError> {
        let Some(api) = self.controller.api() else {
            self.prompt.alert("Error", NOT_CONFIGURED);
            return Err(TrackerError::NotConfigured);
        };

        match browse::fetch_hierarchy(api, self.controller.team_id()).await {
            Ok(tree) => {
                self.prompt.show(browse::render(&tree).trim_end());
                Ok(())
            }
            Err(e) => {
                self.prompt
                    .alert("Error", &format!("Failed to browse tasks: {}", e));
                Err(e)
            }
        }
    }

    async fn quit(&mut self) {
        if self.state.is_tracking() && !self.prompt.confirm(QUIT_WHILE_TRACKING).await {
            return;
        }
        self.running = false;
    }
}
