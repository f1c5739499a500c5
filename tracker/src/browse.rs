use std::fmt::Write;

use clickup::{List, Space, Task, Team};

use crate::api::TimeTrackingApi;
use crate::error::TrackerError;

#[derive(Debug, Clone)]
pub struct TeamNode {
    pub team: Team,
    pub spaces: Vec<SpaceNode>,
}

#[derive(Debug, Clone)]
pub struct SpaceNode {
    pub space: Space,
    pub lists: Vec<ListNode>,
}

#[derive(Debug, Clone)]
pub struct ListNode {
    pub list: List,
    pub tasks: Vec<Task>,
}

/// Walk teams, spaces, lists and tasks. `team_id` limits the walk to one
/// workspace.
pub async fn fetch_hierarchy<A: TimeTrackingApi + ?Sized>(
    api: &A,
    team_id: Option<&str>,
) -> Result<Vec<TeamNode>, TrackerError> {
    let teams: Vec<Team> = api
        .list_teams()
        .await?
        .into_iter()
        .filter(|team| team_id.map_or(true, |id| team.id == id))
        .collect();
    if teams.is_empty() {
        return Err(TrackerError::NoTeams);
    }

    let mut tree = Vec::with_capacity(teams.len());
    for team in teams {
        let mut spaces = Vec::new();
        for space in api.list_spaces(&team.id).await? {
            let mut lists = Vec::new();
            for list in api.list_lists(&space.id).await? {
                let tasks = api.list_tasks(&list.id).await?;
                lists.push(ListNode { list, tasks });
            }
            spaces.push(SpaceNode { space, lists });
        }
        tracing::debug!(team = %team.id, spaces = spaces.len(), "Fetched workspace");
        tree.push(TeamNode { team, spaces });
    }

    Ok(tree)
}

pub fn render(tree: &[TeamNode]) -> String {
    let mut out = String::new();
    for node in tree {
        let _ = writeln!(out, "{} (team {})", node.team.name, node.team.id);
        for space in &node.spaces {
            let _ = writeln!(out, "  {}", space.space.name);
            for list in &space.lists {
                let _ = writeln!(out, "    {}", list.list.name);
                if list.tasks.is_empty() {
                    let _ = writeln!(out, "      (no tasks)");
                }
                for task in &list.tasks {
                    let _ = writeln!(out, "      {}  {}", task.id, task.name);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;

    #[tokio::test]
    async fn walks_the_dev_workspace() {
        let api = DevBackend::new();

        let tree = fetch_hierarchy(&api, None).await.unwrap();

        assert_eq!(tree.len(), 1);
        let lists = &tree[0].spaces[0].lists;
        assert_eq!(lists[0].list.name, "Sprint 42");
        assert!(lists[0].tasks.iter().any(|task| task.id == "1001"));

        let rendered = render(&tree);
        assert!(rendered.contains("Dev Workspace (team 9001)"));
        assert!(rendered.contains("      1001  Fix login redirect"));
    }

    #[tokio::test]
    async fn unknown_team_filter_is_no_teams() {
        let api = DevBackend::new();

        let err = fetch_hierarchy(&api, Some("42")).await.unwrap_err();

        assert!(matches!(err, TrackerError::NoTeams));
        assert_eq!(api.calls("list_spaces"), 0);
    }
}
