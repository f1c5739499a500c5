use std::path::{Path, PathBuf};

use clickup::Credentials;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Reminder interval when none is configured, matching an hourly nudge.
pub const DEFAULT_REMINDER_MINUTES: u32 = 60;

/// Environment variables with this prefix override the config file, e.g.
/// `CLICKUP_TRACKER_API_TOKEN`.
pub const ENV_PREFIX: &str = "CLICKUP_TRACKER";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Personal ClickUp API token (Settings > Apps in ClickUp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Workspace all time entries are booked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Alternative API base URL, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Minutes between "still tracking" reminders; `0` disables them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
}

impl TrackerConfig {
    pub fn default_path() -> Result<PathBuf, TrackerError> {
        Ok(dirs::config_dir()
            .ok_or_else(|| TrackerError::Config("Cannot determine config directory".to_string()))?
            .join("clickup-tracker")
            .join("config.toml"))
    }

    /// Load config from `path`, layered under environment overrides. A
    /// missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|settings| settings.try_deserialize::<Self>())
            .map_err(|e| {
                TrackerError::Config(format!("Failed to load {}: {}", path.display(), e))
            })
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), TrackerError> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config: {}", e)))?;
        secure_write(path, &raw).map_err(|e| {
            TrackerError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn api_token(&self) -> Option<&str> {
        non_blank(self.api_token.as_deref())
    }

    pub fn team_id(&self) -> Option<&str> {
        non_blank(self.team_id.as_deref())
    }

    pub fn base_url(&self) -> Option<&str> {
        non_blank(self.base_url.as_deref())
    }

    pub fn reminder_interval(&self) -> Option<time::Duration> {
        match self.reminder_minutes.unwrap_or(DEFAULT_REMINDER_MINUTES) {
            0 => None,
            minutes => Some(time::Duration::minutes(i64::from(minutes))),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.api_token().and_then(|token| Credentials::new(token).ok())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Write `content` readable by the owner only; the file holds an API token.
fn secure_write(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        use std::{io::Write, os::unix::fs::OpenOptionsExt};

        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}
