use clickup::{Team, User};

use crate::api::TimeTrackingApi;
use crate::config::TrackerConfig;
use crate::error::TrackerError;

/// A token that authenticated successfully, with the workspace it will book
/// time in.
#[derive(Debug, Clone)]
pub struct ValidatedAccount {
    pub user: User,
    pub team: Team,
}

/// Check a freshly entered token against ClickUp and pick a workspace.
///
/// `preferred_team` selects a workspace by id; without one (or when it is
/// not among the user's workspaces) the first workspace wins.
pub async fn validate_token<A: TimeTrackingApi + ?Sized>(
    api: &A,
    preferred_team: Option<&str>,
) -> Result<ValidatedAccount, TrackerError> {
    let user = api.get_authenticated_user().await?;
    let mut teams = api.list_teams().await?;

    if teams.is_empty() {
        return Err(TrackerError::NoTeams);
    }

    let index = match preferred_team.map(str::trim) {
        Some(wanted) => teams
            .iter()
            .position(|team| team.id == wanted)
            .unwrap_or_else(|| {
                tracing::warn!(
                    wanted,
                    fallback = %teams[0].id,
                    "Workspace not found for this account, using the first one"
                );
                0
            }),
        None => 0,
    };
    let team = teams.swap_remove(index);

    tracing::info!(
        user = %user.display_name(),
        team = %team.name,
        "ClickUp token validated"
    );
    Ok(ValidatedAccount { user, team })
}

/// Store a validated token and workspace into `config`.
pub fn apply(config: &mut TrackerConfig, api_token: &str, account: &ValidatedAccount) {
    config.api_token = Some(api_token.trim().to_string());
    config.team_id = Some(account.team.id.clone());
}
