use crate::api::{Connect, TimeTrackingApi};
use crate::config::TrackerConfig;
use crate::tracking::{Controller, Reconciliation, TrackingState};

/// Build the controller from stored configuration. Missing or unusable
/// credentials leave it unconfigured rather than failing.
pub fn build_controller<A: Connect>(config: &TrackerConfig) -> Controller<A> {
    let Some(token) = config.api_token() else {
        tracing::info!("No API token configured");
        return Controller::unconfigured();
    };

    match A::connect(token, config.base_url()) {
        Ok(api) => {
            let controller = Controller::from_parts(Some(api), config.team_id().map(str::to_string));
            if !controller.is_configured() {
                tracing::info!("No workspace configured");
            }
            controller
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not create ClickUp client");
            Controller::unconfigured()
        }
    }
}

/// Pick up a timer that is already running remotely. Failures are logged
/// and the app starts idle.
pub async fn initialize_tracking_state<A: TimeTrackingApi>(
    controller: &Controller<A>,
    state: &mut TrackingState,
) -> Option<Reconciliation> {
    if !controller.is_configured() {
        return None;
    }

    match controller.reconcile(state).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            tracing::warn!(error = %e, "Could not check for a running timer");
            None
        }
    }
}
