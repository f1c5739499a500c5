use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clickup::ClickUpClient;
use clickup_tracker::api::{Connect, DevBackend};
use clickup_tracker::bootstrap::build_controller;
use clickup_tracker::cli::{Cli, Commands};
use clickup_tracker::config::TrackerConfig;
use clickup_tracker::notify::TerminalNotifier;
use clickup_tracker::prompt::TerminalPrompt;
use clickup_tracker::runtime::{run_app, App, Command};
use clickup_tracker::{logging, time_utils};

const DEV_TEAM_ID: &str = "9001";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Must run before any other thread exists.
    time_utils::init_local_offset();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => TrackerConfig::default_path()?,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = load_config(&config_path)?;
            run_shell::<ClickUpClient>(config, Some(config_path)).await
        }
        Commands::Dev => {
            let config = TrackerConfig {
                api_token: Some("dev".to_string()),
                team_id: Some(DEV_TEAM_ID.to_string()),
                base_url: None,
                reminder_minutes: None,
            };
            println!("Dev mode: using local in-memory data, nothing is sent to ClickUp.");
            run_shell::<DevBackend>(config, None).await
        }
        Commands::Status => run_once(&config_path, Command::Status).await,
        Commands::Start { task, mode } => {
            let command = match task {
                Some(query) => Command::StartTask { query, mode },
                None => Command::Start,
            };
            run_once(&config_path, command).await
        }
        Commands::Stop => run_once(&config_path, Command::Stop).await,
        Commands::Settings { token, team } => {
            run_once(&config_path, Command::Settings { token, team }).await
        }
        Commands::Browse => run_once(&config_path, Command::Browse).await,
        Commands::ConfigPath => {
            if !config_path.exists() {
                TrackerConfig::default()
                    .save(&config_path)
                    .context("Failed to create default config")?;
            }
            println!("{}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: &std::path::Path) -> Result<TrackerConfig> {
    TrackerConfig::load(path).context("Failed to load configuration")
}

async fn run_shell<A: Connect>(config: TrackerConfig, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let controller = build_controller::<A>(&config);
    let mut app = App::new(
        controller,
        TerminalPrompt::new(),
        TerminalNotifier,
        config,
        config_path,
    );

    app.initialize().await;
    run_app(&mut app).await;

    println!("\n👋 Goodbye!");
    Ok(ExitCode::SUCCESS)
}

/// Reconcile, then run a single command.
async fn run_once(config_path: &std::path::Path, command: Command) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let controller = build_controller::<ClickUpClient>(&config);
    let mut app = App::new(
        controller,
        TerminalPrompt::new(),
        TerminalNotifier,
        config,
        Some(config_path.to_path_buf()),
    );

    app.initialize().await;
    if let Err(e) = app.run_command(command).await {
        tracing::debug!(error = %e, "Command failed");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
