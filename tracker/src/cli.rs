use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::tracking::ResolveMode;

#[derive(Debug, Parser)]
#[command(name = "clickup-tracker")]
#[command(about = "Track time against ClickUp tasks from the terminal")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive shell against ClickUp (default)
    Run,
    /// Open the interactive shell with local in-memory data
    Dev,
    /// Print what is being tracked right now
    Status,
    /// Start tracking, optionally assigning a task first
    Start {
        /// Task id or search term; nothing starts unless a task is assigned
        #[arg(long)]
        task: Option<String>,
        /// How to resolve --task
        #[arg(long, value_enum, default_value_t = ResolveMode::Auto)]
        mode: ResolveMode,
    },
    /// Stop the running timer
    Stop,
    /// Validate an API token and save it with a workspace
    Settings {
        /// Personal API token; asked for when omitted
        token: Option<String>,
        /// Workspace id; the first workspace is used when omitted
        #[arg(long)]
        team: Option<String>,
    },
    /// List workspaces, spaces, lists and tasks
    Browse,
    /// Print config path and create default file if missing
    ConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["clickup-tracker"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn start_with_task_and_mode() {
        let cli = Cli::try_parse_from([
            "clickup-tracker",
            "start",
            "--task",
            "86a0xyz",
            "--mode",
            "by-id",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Start { task, mode }) => {
                assert_eq!(task.as_deref(), Some("86a0xyz"));
                assert_eq!(mode, ResolveMode::ById);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn settings_takes_token_and_team() {
        let cli =
            Cli::try_parse_from(["clickup-tracker", "--config", "/tmp/c.toml", "settings", "pk_1", "--team", "42"])
                .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Settings { token: Some(_), team: Some(_) })
        ));
    }
}
