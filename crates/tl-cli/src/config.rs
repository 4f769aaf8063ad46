//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the ledger file.
    pub journal_path: PathBuf,

    /// Path to the project list file.
    pub project_list_path: PathBuf,

    /// Hours of work expected per day.
    pub daily_target_hours: f64,

    /// Hours of work expected per week.
    pub weekly_target_hours: f64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            journal_path: data_dir.join("timelog.txt"),
            project_list_path: data_dir.join("project-list.txt"),
            daily_target_hours: 8.0,
            weekly_target_hours: 40.0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TL_*)
        figment = figment.merge(Env::prefixed("TL_"));

        let config: Self = figment.extract()?;
        check_target("daily_target_hours", config.daily_target_hours, 24.0)?;
        check_target("weekly_target_hours", config.weekly_target_hours, 168.0)?;
        Ok(config)
    }

    pub fn daily_target(&self) -> Duration {
        hours(self.daily_target_hours)
    }

    pub fn weekly_target(&self) -> Duration {
        hours(self.weekly_target_hours)
    }
}

#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large but only returned at startup"
)]
fn check_target(key: &str, value: f64, max: f64) -> Result<(), figment::Error> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(figment::Error::from(format!(
            "{key} must be between 0 and {max} hours, got {value}"
        )))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "targets are checked against a week at load time"
)]
fn hours(value: f64) -> Duration {
    Duration::minutes((value * 60.0).round() as i64)
}

/// Returns the platform-specific config directory for tl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}

/// Returns the platform-specific data directory for tl.
///
/// On Linux: `~/.local/share/tl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tl"))
}
