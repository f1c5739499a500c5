use clickup::ClickUpError;
use thiserror::Error;

use crate::tracking::Candidate;

/// Errors surfaced by tracking operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("ClickUp is not configured. Set an API token and workspace in settings first.")]
    NotConfigured,
    #[error(transparent)]
    Remote(#[from] ClickUpError),
    #[error("no task matches \"{query}\"")]
    NoMatch { query: String },
    #[error("{total} tasks match \"{query}\"")]
    AmbiguousMatch {
        query: String,
        total: usize,
        candidates: Vec<Candidate>,
    },
    #[error("no task was assigned")]
    NothingAssigned,
    #[error("no workspaces found for this account")]
    NoTeams,
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// No-match, ambiguous-match and an abandoned assignment are prompts for
    /// the user, not faults.
    pub fn is_fault(&self) -> bool {
        !matches!(
            self,
            TrackerError::NoMatch { .. }
                | TrackerError::AmbiguousMatch { .. }
                | TrackerError::NothingAssigned
        )
    }
}
