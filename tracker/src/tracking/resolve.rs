use clap::ValueEnum;
use clickup::{ClickUpError, Task};

use super::Candidate;
use crate::{api::TimeTrackingApi, error::TrackerError};

/// At most this many search hits are offered back for disambiguation.
pub const MAX_CANDIDATES: usize = 5;

/// Queries shorter than this are tried as task ids first.
const ID_LENGTH_THRESHOLD: usize = 20;

/// How a free-text query is turned into a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ResolveMode {
    /// Try a direct id lookup when the query looks like an id, then search.
    #[default]
    Auto,
    /// Only a direct id lookup.
    ById,
    /// Only a search.
    BySearch,
}

/// What happened to the direct id lookup on the way to a search result.
#[derive(Debug)]
pub enum DirectLookup {
    /// The query did not look like an id, or the mode skipped it.
    Skipped,
    /// The lookup failed and resolution fell through to search.
    Failed(ClickUpError),
}

#[derive(Debug)]
pub enum Resolution {
    ById(Task),
    BySearch { task: Task, direct_lookup: DirectLookup },
}

impl Resolution {
    pub fn task(&self) -> &Task {
        match self {
            Resolution::ById(task) => task,
            Resolution::BySearch { task, .. } => task,
        }
    }

    pub fn into_task(self) -> Task {
        match self {
            Resolution::ById(task) => task,
            Resolution::BySearch { task, .. } => task,
        }
    }
}

/// Numeric, or short enough to plausibly be a ClickUp task id.
pub fn looks_like_task_id(query: &str) -> bool {
    query.chars().all(|c| c.is_ascii_digit()) || query.chars().count() < ID_LENGTH_THRESHOLD
}

/// Resolve `query` to exactly one task.
///
/// Zero search hits is [`TrackerError::NoMatch`]; several is
/// [`TrackerError::AmbiguousMatch`] with the first [`MAX_CANDIDATES`] hits.
/// Nothing is guessed.
pub async fn resolve_task<A>(
    api: &A,
    team_id: &str,
    query: &str,
    mode: ResolveMode,
) -> Result<Resolution, TrackerError>
where
    A: TimeTrackingApi + ?Sized,
{
    let direct_lookup = match mode {
        ResolveMode::ById => return Ok(Resolution::ById(api.get_task(query).await?)),
        ResolveMode::BySearch => DirectLookup::Skipped,
        ResolveMode::Auto if looks_like_task_id(query) => match api.get_task(query).await {
            Ok(task) => return Ok(Resolution::ById(task)),
            Err(e) => {
                tracing::debug!(query, error = %e, "Direct task lookup failed, searching instead");
                DirectLookup::Failed(e)
            }
        },
        ResolveMode::Auto => DirectLookup::Skipped,
    };

    let mut tasks = api.search_tasks(team_id, query).await?;
    match tasks.len() {
        0 => Err(TrackerError::NoMatch {
            query: query.to_string(),
        }),
        1 => Ok(Resolution::BySearch {
            task: tasks.remove(0),
            direct_lookup,
        }),
        total => Err(TrackerError::AmbiguousMatch {
            query: query.to_string(),
            total,
            candidates: tasks
                .iter()
                .take(MAX_CANDIDATES)
                .map(Candidate::from)
                .collect(),
        }),
    }
}
