use crate::tracking::ResolveMode;

/// One shell command. The one-shot CLI subcommands map onto the same set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Assign {
        query: Option<String>,
        mode: ResolveMode,
    },
    /// Assign and start in one go. Nothing starts unless a task was armed.
    StartTask {
        query: String,
        mode: ResolveMode,
    },
    Refresh,
    Status,
    Settings {
        token: Option<String>,
        team: Option<String>,
    },
    Browse,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  start              start tracking the armed task (or no task)
  start <query>      assign a task, then start tracking it
  stop               stop tracking and save the entry
  assign [query]     assign a task by id or search term
  task <id>          assign a task by id only
  find <text>        assign a task by search only
  refresh            reload the running timer from ClickUp
  status             show the menu
  settings [token]   set the API token
  browse             list workspaces, spaces, lists and tasks
  help               show this help
  quit               leave";

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Assign { .. } => "assign",
            Command::StartTask { .. } => "start_task",
            Command::Refresh => "refresh",
            Command::Status => "status",
            Command::Settings { .. } => "settings",
            Command::Browse => "browse",
            Command::Help => "help",
            Command::Quit => "quit",
            Command::Unknown(_) => "unknown",
        }
    }

    /// `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let rest = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_ascii_lowercase().as_str() {
            "start" => match rest {
                Some(query) => Command::StartTask {
                    query,
                    mode: ResolveMode::Auto,
                },
                None => Command::Start,
            },
            "stop" | "pause" => Command::Stop,
            "assign" | "a" => Command::Assign {
                query: rest,
                mode: ResolveMode::Auto,
            },
            "task" => Command::Assign {
                query: rest,
                mode: ResolveMode::ById,
            },
            "find" | "search" => Command::Assign {
                query: rest,
                mode: ResolveMode::BySearch,
            },
            "refresh" | "r" => Command::Refresh,
            "status" | "menu" | "s" => Command::Status,
            "settings" => Command::Settings {
                token: rest,
                team: None,
            },
            "browse" | "ls" => Command::Browse,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(word.to_string()),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn assign_keeps_the_whole_query() {
        assert_eq!(
            Command::parse("assign  release notes "),
            Some(Command::Assign {
                query: Some("release notes".to_string()),
                mode: ResolveMode::Auto,
            })
        );
        assert_eq!(
            Command::parse("assign"),
            Some(Command::Assign {
                query: None,
                mode: ResolveMode::Auto,
            })
        );
    }

    #[test]
    fn explicit_modes() {
        assert!(matches!(
            Command::parse("task 1001"),
            Some(Command::Assign {
                mode: ResolveMode::ById,
                ..
            })
        ));
        assert!(matches!(
            Command::parse("FIND login"),
            Some(Command::Assign {
                mode: ResolveMode::BySearch,
                ..
            })
        ));
    }

    #[test]
    fn start_with_a_query_assigns_first() {
        assert_eq!(Command::parse("start"), Some(Command::Start));
        assert_eq!(
            Command::parse("start 1001"),
            Some(Command::StartTask {
                query: "1001".to_string(),
                mode: ResolveMode::Auto,
            })
        );
    }

    #[test]
    fn unknown_word_is_reported() {
        assert_eq!(
            Command::parse("dance now"),
            Some(Command::Unknown("dance".to_string()))
        );
    }
}
