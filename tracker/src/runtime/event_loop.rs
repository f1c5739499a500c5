use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::actions::App;
use super::commands::Command;
use crate::api::Connect;
use crate::notify::Notifier;
use crate::prompt::Prompt;
use crate::time_utils::now_local;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Read commands until `quit` or end of input, refreshing the elapsed time
/// once per second in between. The tick never talks to ClickUp.
pub async fn run_app<A, P, N>(app: &mut App<A, P, N>)
where
    A: Connect,
    P: Prompt,
    N: Notifier,
{
    app.render_menu();
    app.tick(now_local());

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while app.is_running() {
        tokio::select! {
            line = app.prompt_mut().next_line() => {
                let Some(line) = line else {
                    tracing::debug!("Input closed");
                    break;
                };
                if let Some(command) = Command::parse(&line) {
                    // Failures were already shown to the user.
                    let _ = app.run_command(command).await;
                }
            }
            _ = ticker.tick() => app.tick(now_local()),
        }
    }
}
