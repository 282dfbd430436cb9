use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::settings::TimelineSettings;
use crate::timeline::{TimelineError, TimelineResult};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "DAY_TIMELINE_CONFIG";

const CONFIG_FILE_NAME: &str = "timeline.toml";
const DATABASE_FILE_NAME: &str = "timeline.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "DayTimeline", "DayTimeline")
}

/// Parse and validate settings text.
pub fn parse_settings(text: &str) -> TimelineResult<TimelineSettings> {
    let settings: TimelineSettings =
        toml::from_str(text).map_err(|e| TimelineError::Config(e.to_string()))?;
    settings.validate().map_err(TimelineError::Config)?;
    Ok(settings)
}

/// Where the event database lives when the settings don't say.
pub fn default_database_path() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(DATABASE_FILE_NAME)
    }

    #[cfg(not(debug_assertions))]
    {
        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
            None => PathBuf::from(DATABASE_FILE_NAME),
        }
    }
}

pub struct SettingsService {
    path: Option<PathBuf>,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Resolve the settings file from the environment, then the platform config dir.
    pub fn from_environment() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
            return Self::new(path);
        }

        let path = project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME));
        if path.is_none() {
            log::warn!("No config directory available; using default timeline settings");
        }
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load settings; a missing file yields defaults, a malformed one is an error.
    pub fn load(&self) -> TimelineResult<TimelineSettings> {
        let Some(path) = &self.path else {
            return Ok(TimelineSettings::default());
        };

        if !path.exists() {
            log::info!(
                "No settings file at {}, using defaults",
                path.display()
            );
            return Ok(TimelineSettings::default());
        }

        let text = fs::read_to_string(path).map_err(|e| {
            TimelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings = parse_settings(&text)?;
        log::info!("Loaded timeline settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings back as TOML, creating the directory if needed.
    pub fn save(&self, settings: &TimelineSettings) -> Result<()> {
        let Some(path) = &self.path else {
            anyhow::bail!("No settings file location available");
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, text).context(format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
