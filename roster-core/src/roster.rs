//! Roster directory management.
//!
//! A roster directory holds `roster.toml` and the files backing the grid,
//! the log, the notes, the employee directory and the imported survey.

use std::path::{Path, PathBuf};

use crate::config::{GlobalConfig, ROSTER_CONFIG_FILE, RosterConfig};
use crate::employees::EmployeeList;
use crate::error::RosterResult;
use crate::grid::MemoryGrid;
use crate::log_store::MemoryLogStore;
use crate::notes::MemoryNoteStore;
use crate::schedule::ScheduleSheet;

#[derive(Debug, Clone)]
pub struct Roster {
    dir: PathBuf,
    config: RosterConfig,
}

impl Roster {
    /// Open the roster directory named in the global config.
    pub fn load() -> RosterResult<Self> {
        let global = GlobalConfig::load()?;
        Roster::open(global.roster_dir())
    }

    pub fn open(dir: PathBuf) -> RosterResult<Self> {
        let config = RosterConfig::load(&dir)?;
        Ok(Roster { dir, config })
    }

    /// Create the directory with a default roster.toml unless one exists.
    /// Returns the roster and whether a config file was written.
    pub fn init(dir: PathBuf) -> RosterResult<(Self, bool)> {
        let created = !dir.join(ROSTER_CONFIG_FILE).exists();
        if created {
            RosterConfig::create_default(&dir)?;
        }
        Ok((Roster::open(dir)?, created))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn grid_path(&self) -> PathBuf {
        self.dir.join(&self.config.files.grid)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.config.files.log)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.dir.join(&self.config.files.notes)
    }

    pub fn employees_path(&self) -> PathBuf {
        self.dir.join(&self.config.files.employees)
    }

    pub fn survey_path(&self) -> PathBuf {
        self.dir.join(&self.config.files.survey)
    }

    pub fn load_log(&self) -> RosterResult<MemoryLogStore> {
        MemoryLogStore::load(&self.log_path())
    }

    pub fn load_notes(&self) -> RosterResult<MemoryNoteStore> {
        MemoryNoteStore::load(&self.notes_path())
    }

    pub fn load_employees(&self) -> RosterResult<EmployeeList> {
        EmployeeList::load(&self.employees_path())
    }

    pub fn load_survey(&self) -> RosterResult<MemoryGrid> {
        MemoryGrid::load(&self.survey_path())
    }

    /// The schedule sheet as last saved. Fails if it was never set up.
    pub fn open_sheet(&self) -> RosterResult<ScheduleSheet<MemoryGrid>> {
        let grid = MemoryGrid::load(&self.grid_path())?;
        ScheduleSheet::open(grid, self.config.layout)
    }

    /// The saved grid, or an empty one.
    pub fn load_grid(&self) -> RosterResult<MemoryGrid> {
        MemoryGrid::load(&self.grid_path())
    }

    pub fn save_sheet(&self, sheet: &ScheduleSheet<MemoryGrid>) -> RosterResult<()> {
        sheet.grid().save(&self.grid_path())
    }
}
