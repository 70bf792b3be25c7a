//! Keeping the schedule grid and the assignment log in agreement.
//!
//! Both sides are lists of entries in slot order. A single merge pass finds
//! the slots they disagree on, and sync replaces each such slot in the log
//! with what the grid holds.

mod diff_kind;
mod slot_diff;

use std::cmp::Ordering;
use std::collections::HashSet;

pub use diff_kind::DiffKind;
pub use slot_diff::SlotDiff;

use crate::employees::EmployeeDirectory;
use crate::error::RosterResult;
use crate::grid::GridStore;
use crate::log_store::LogStore;
use crate::notes::NoteStore;
use crate::schedule::ScheduleSheet;
use crate::slot::{Entry, Slot, compare_slots};
use crate::survey::{self, SurveyResponse};

/// Merge two entry lists sorted in slot order into the list of slots they
/// disagree on.
pub fn diff(grid_entries: &[Entry], log_entries: &[Entry]) -> Vec<SlotDiff> {
    let mut diffs = Vec::new();
    let mut grid = grid_entries.iter().peekable();
    let mut log = log_entries.iter().peekable();

    loop {
        let (in_grid, in_log) = match (grid.peek().copied(), log.peek().copied()) {
            (None, None) => break,
            (Some(_), None) => (grid.next(), None),
            (None, Some(_)) => (None, log.next()),
            (Some(g), Some(l)) => match compare_slots(&g.slot, &l.slot) {
                Ordering::Less => (grid.next(), None),
                Ordering::Greater => (None, log.next()),
                Ordering::Equal => (grid.next(), log.next()),
            },
        };
        diffs.extend(SlotDiff::get_diff(in_log, in_grid));
    }
    diffs
}

/// Slots where the sheet and the log disagree, limited to the sheet's range.
pub fn pending<G: GridStore>(
    sheet: &ScheduleSheet<G>,
    log: &dyn LogStore,
) -> RosterResult<Vec<SlotDiff>> {
    let grid_entries = sheet.scan()?;
    let log_entries = log.entries_in(&sheet.range())?;
    Ok(diff(&grid_entries, &log_entries))
}

/// Replace every differing slot in the log with the grid's version.
pub fn apply(diffs: &[SlotDiff], log: &mut dyn LogStore) -> RosterResult<()> {
    for d in diffs {
        tracing::debug!(%d, "applying diff");
        log.remove_matching(d.slot.date, d.slot.location.name, d.slot.shift.name)?;
        if !d.employees_in_grid.is_empty() {
            log.add(&[d.grid_entry()])?;
        }
    }
    Ok(())
}

/// Bring the log in line with the sheet.
pub fn sync<G: GridStore>(
    sheet: &ScheduleSheet<G>,
    log: &mut dyn LogStore,
) -> RosterResult<SyncReport> {
    let diffs = pending(sheet, log)?;
    apply(&diffs, log)?;
    let report = SyncReport(diffs);
    let (added, changed, removed) = report.counts();
    tracing::info!(added, changed, removed, "synced schedule to log");
    Ok(report)
}

/// The diffs one sync applied.
#[derive(Debug, Clone, Default)]
pub struct SyncReport(pub Vec<SlotDiff>);

impl SyncReport {
    /// (added, changed, removed)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut added = 0;
        let mut changed = 0;
        let mut removed = 0;

        for diff in &self.0 {
            match diff.kind() {
                DiffKind::Added => added += 1,
                DiffKind::Changed => changed += 1,
                DiffKind::Removed => removed += 1,
            }
        }

        (added, changed, removed)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    pub placed: usize,
    /// Already on that slot in the log.
    pub already_placed: usize,
    /// Employee has no location in the employee pane.
    pub unassigned: usize,
    pub out_of_range: usize,
}

/// Put survey responses onto the schedule.
///
/// The sheet is synced first so no grid edits are lost, then each employee's
/// unique responses go to the location they are assigned to in the employee
/// pane. The sheet is rebuilt from the log afterwards.
pub fn place_survey<G: GridStore>(
    sheet: ScheduleSheet<G>,
    log: &mut dyn LogStore,
    notes: &mut dyn NoteStore,
    employees: &dyn EmployeeDirectory,
    responses: &[SurveyResponse],
) -> RosterResult<(ScheduleSheet<G>, PlacementReport)> {
    sync(&sheet, log)?;
    sheet.save_notes(notes)?;

    let range = sheet.range();
    let layout = sheet.mapper().layout;
    let assigned = sheet.employees_and_locations(employees)?;

    let mut existing: HashSet<(Slot, String)> = HashSet::new();
    for entry in log.entries_in(&range)? {
        for name in entry.employee_names() {
            existing.insert((entry.slot, name.to_string()));
        }
    }

    let mut report = PlacementReport::default();
    let mut entries = Vec::new();
    for response in survey::unique_longest(responses) {
        if !range.contains(response.date) {
            report.out_of_range += 1;
            continue;
        }
        let Some(&location) = assigned.get(&response.employee) else {
            report.unassigned += 1;
            continue;
        };
        let slot = Slot::new(response.date, location, response.shift);
        if existing.contains(&(slot, response.employee.clone())) {
            report.already_placed += 1;
            continue;
        }
        entries.push(Entry::new(slot, vec![response.item()]));
        report.placed += 1;
    }

    log.add(&entries)?;
    tracing::info!(placed = report.placed, "placed survey responses");
    let sheet = ScheduleSheet::setup(sheet.into_grid(), layout, range, &*log, &*notes, employees)?;
    Ok((sheet, report))
}
