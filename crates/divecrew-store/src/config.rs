//! Scheduler runtime configuration.
//!
//! Loaded from a JSON file; every field has a default so a partial file
//! (or none at all) is a valid configuration.
//!
//! ```
//! use divecrew_store::config::{validate_config, SchedulerConfig};
//!
//! let mut config = SchedulerConfig::default();
//! config.print_range_weeks = 8;
//! assert!(validate_config(&config).is_empty());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use divecrew_logic::calendar::week_anchor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StoreError;

/// Longest print range accepted, two years of weeks.
pub const MAX_PRINT_RANGE_WEEKS: u32 = 104;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Where the binary snapshot of crew and schedule lives.
    pub snapshot_path: PathBuf,
    /// Crew service JSON export to seed an empty directory from.
    pub roster_import: Option<PathBuf>,
    /// Refuse edits to weeks before the current week.
    pub lock_past_weeks: bool,
    /// Default number of weeks in a printed schedule.
    pub print_range_weeks: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("divecrew.snapshot"),
            roster_import: None,
            lock_past_weeks: true,
            print_range_weeks: 4,
        }
    }
}

impl SchedulerConfig {
    /// Resolve relative paths against `base`. Absolute paths are kept.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.snapshot_path = base.join(&self.snapshot_path);
        self.roster_import = self.roster_import.map(|p| base.join(p));
        self
    }

    /// First and last day of the default print range, starting the week
    /// that contains `start`.
    pub fn print_range(&self, start: NaiveDate) -> (NaiveDate, NaiveDate) {
        let first = week_anchor(start);
        let span = i64::from(self.print_range_weeks.max(1)) - 1;
        let last = first.checked_add_weeks(span).unwrap_or(first);
        (first.date(), last.date())
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("snapshot path is empty")]
    EmptySnapshotPath,
    #[error("roster import path is empty")]
    EmptyRosterImportPath,
    #[error("print range must cover at least one week")]
    PrintRangeTooShort,
    #[error("print range of {0} weeks exceeds {MAX_PRINT_RANGE_WEEKS}")]
    PrintRangeTooLong(u32),
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &SchedulerConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.snapshot_path.as_os_str().is_empty() {
        errors.push(ConfigError::EmptySnapshotPath);
    }
    if matches!(&config.roster_import, Some(p) if p.as_os_str().is_empty()) {
        errors.push(ConfigError::EmptyRosterImportPath);
    }
    if config.print_range_weeks == 0 {
        errors.push(ConfigError::PrintRangeTooShort);
    }
    if config.print_range_weeks > MAX_PRINT_RANGE_WEEKS {
        errors.push(ConfigError::PrintRangeTooLong(config.print_range_weeks));
    }

    errors
}

/// Parse configuration JSON. Validation is left to the caller.
pub fn parse_config(json: &str) -> Result<SchedulerConfig, StoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a configuration file. Relative paths in it are resolved against
/// the file's directory; problems are logged, not returned.
pub fn load_config(path: &Path) -> Result<SchedulerConfig, StoreError> {
    let text = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let config = parse_config(&text)?.relative_to(base);
    for problem in validate_config(&config) {
        log::warn!("{}: {}", path.display(), problem);
    }
    Ok(config)
}
