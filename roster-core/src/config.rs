//! Configuration: the global config file and the per-roster `roster.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};

static DEFAULT_ROSTER_PATH: &str = "~/roster";
pub const ROSTER_CONFIG_FILE: &str = "roster.toml";

fn default_roster_path() -> PathBuf {
    PathBuf::from(DEFAULT_ROSTER_PATH)
}

/// Global configuration at ~/.config/roster/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlobalConfig {
    #[serde(default = "default_roster_path")]
    pub roster_dir: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig { roster_dir: default_roster_path() }
    }
}

impl GlobalConfig {
    pub fn config_path() -> RosterResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RosterError::Config("Could not determine config directory".into()))?
            .join("roster");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> RosterResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| RosterError::Config(e.to_string()))
    }

    /// Roster directory with `~` expanded.
    pub fn roster_dir(&self) -> PathBuf {
        expand_path(&self.roster_dir)
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Where the schedule's body starts on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub first_entry_row: u32,
    pub first_entry_column: u32,
    /// Column holding the date of each block.
    pub index_column: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout { first_entry_row: 3, first_entry_column: 7, index_column: 5 }
    }
}

impl Layout {
    /// The header takes row 1 and the employee pane columns 1 to 3, with the
    /// pane's own header on the row above the first entry.
    pub fn validate(&self) -> RosterResult<()> {
        if self.first_entry_row < 3 {
            return Err(invalid("layout.first_entry_row", self.first_entry_row, "at least 3"));
        }
        if self.index_column < 4 {
            return Err(invalid("layout.index_column", self.index_column, "at least 4"));
        }
        if self.first_entry_column <= self.index_column {
            return Err(invalid(
                "layout.first_entry_column",
                self.first_entry_column,
                "right of layout.index_column",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: u32, expected: &str) -> RosterError {
    RosterError::Config(format!("{key} = {value}, expected {expected}"))
}

/// Where things are in an imported survey table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyLayout {
    pub month_row: u32,
    pub day_row: u32,
    pub time_row: u32,
    pub first_column: u32,
    pub name_column: u32,
    pub first_response_row: u32,
    pub available_marker: String,
    /// Label of the row that ends the responses.
    pub summary_label: String,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        SurveyLayout {
            month_row: 4,
            day_row: 5,
            time_row: 6,
            first_column: 2,
            name_column: 1,
            first_response_row: 7,
            available_marker: "OK".into(),
            summary_label: "Count".into(),
        }
    }
}

impl SurveyLayout {
    pub fn validate(&self) -> RosterResult<()> {
        let positions = [
            ("survey.month_row", self.month_row),
            ("survey.day_row", self.day_row),
            ("survey.time_row", self.time_row),
            ("survey.first_column", self.first_column),
            ("survey.name_column", self.name_column),
            ("survey.first_response_row", self.first_response_row),
        ];
        if let Some((key, value)) = positions.iter().find(|(_, value)| *value == 0) {
            return Err(invalid(key, *value, "at least 1"));
        }
        let last_header_row = self.month_row.max(self.day_row).max(self.time_row);
        if self.first_response_row <= last_header_row {
            return Err(invalid(
                "survey.first_response_row",
                self.first_response_row,
                "below the header rows",
            ));
        }
        if self.available_marker.trim().is_empty() {
            return Err(RosterError::Config("survey.available_marker must not be empty".into()));
        }
        Ok(())
    }
}

/// File names inside the roster directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Files {
    pub grid: String,
    pub log: String,
    pub notes: String,
    pub employees: String,
    pub survey: String,
}

impl Default for Files {
    fn default() -> Self {
        Files {
            grid: "grid.json".into(),
            log: "log.json".into(),
            notes: "notes.json".into(),
            employees: "employees.toml".into(),
            survey: "survey.json".into(),
        }
    }
}

/// Configuration stored in each roster directory's roster.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub survey: SurveyLayout,
    #[serde(default)]
    pub files: Files,
}

impl RosterConfig {
    /// Load config from roster.toml, defaults if the file is missing.
    pub fn load(roster_dir: &Path) -> RosterResult<Self> {
        let path = roster_dir.join(ROSTER_CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: RosterConfig =
            toml::from_str(&content).map_err(|e| RosterError::Config(e.to_string()))?;
        config.layout.validate()?;
        config.survey.validate()?;
        Ok(config)
    }

    /// Write a roster.toml with every option commented out.
    pub fn create_default(roster_dir: &Path) -> RosterResult<PathBuf> {
        let path = roster_dir.join(ROSTER_CONFIG_FILE);
        let defaults = toml::to_string_pretty(&RosterConfig::default())
            .map_err(|e| RosterError::Config(e.to_string()))?;
        let commented: String = defaults
            .lines()
            .map(|l| {
                if l.is_empty() || l.starts_with('[') {
                    format!("{l}\n")
                } else {
                    format!("# {l}\n")
                }
            })
            .collect();
        let contents = format!("# roster configuration\n\n{commented}");

        std::fs::create_dir_all(roster_dir)
            .map_err(|e| RosterError::Config(format!("Could not create roster directory: {e}")))?;
        std::fs::write(&path, contents)
            .map_err(|e| RosterError::Config(format!("Could not write config file: {e}")))?;
        Ok(path)
    }
}
