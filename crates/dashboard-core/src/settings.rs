use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::period::DateRange;
use crate::time_utils;
use tracing::warn;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Website traffic dashboard for the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "traffic-dashboard",
    about = "Website traffic dashboard: compare a date range against the period before it",
    version
)]
pub struct Settings {
    /// Traffic log CSV (columns: date, session_key, uri_lvl_0, uri_title)
    #[arg(long, env = "TRAFFIC_DASHBOARD_DATA", default_value = "app_traffic.csv")]
    pub data_file: PathBuf,

    /// Range bound (YYYY-MM-DD); pass twice to select a range
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub dates: Vec<NaiveDate>,

    /// Select the whole dataset instead of the current month
    #[arg(long, conflicts_with = "dates")]
    pub all: bool,

    /// Output view
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "json"])]
    pub view: String,

    /// Timezone used to decide "today" (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,

    /// Last range that resolved successfully, restored from the saved config.
    #[arg(skip)]
    pub last_valid_range: Option<DateRange>,
}

/// What the user asked for on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSelection {
    /// No dates and no `--all`: the current month, clamped to the data.
    Default,
    /// Explicit dates; empty means "no filter".
    Dates(Vec<NaiveDate>),
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.traffic-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_valid_range: Option<DateRange>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".traffic-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Record `range` as the last valid selection, keeping other fields.
    pub fn remember_range_at(
        path: &std::path::Path,
        range: DateRange,
    ) -> Result<(), std::io::Error> {
        let mut params = Self::load_from(path);
        params.last_valid_range = Some(range);
        params.save_to(path)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, resolve `"auto"` values, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(err) = LastUsedParams::clear_at(config_path) {
                warn!("Could not clear {}: {}", config_path.display(), err);
            }
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI (and env) always win over persisted values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data_file") {
            if let Some(v) = last.data_file {
                settings.data_file = v;
            }
        }
        settings.last_valid_range = last.last_valid_range;

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(err) = params.save_to(config_path) {
            warn!("Could not save {}: {}", config_path.display(), err);
        }

        settings
    }

    /// The date selection implied by `--date` / `--all`.
    pub fn date_selection(&self) -> DateSelection {
        if self.all {
            DateSelection::Dates(Vec::new())
        } else if self.dates.is_empty() {
            DateSelection::Default
        } else {
            DateSelection::Dates(self.dates.clone())
        }
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = time_utils::get_system_timezone();
        } else if !time_utils::validate_timezone(&settings.timezone) {
            let system = time_utils::get_system_timezone();
            warn!(
                "Unknown timezone \"{}\", using system timezone {}",
                settings.timezone, system
            );
            settings.timezone = system;
        }
        if !time_utils::validate_timezone(&settings.timezone) {
            settings.timezone = "UTC".to_string();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            view: Some(s.view.clone()),
            data_file: Some(s.data_file.clone()),
            last_valid_range: s.last_valid_range,
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line or
/// through its environment variable (not via a default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(clap::parser::ValueSource::CommandLine) | Some(clap::parser::ValueSource::EnvVariable)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
