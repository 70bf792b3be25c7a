use anyhow::Result;
use roster_core::dispatch::{EditDispatcher, EditEvent, EditKind, EditOutcome};
use roster_core::grid::{CellValue, GridStore};
use roster_core::roster::Roster;

use crate::render::Render;

/// Apply one cell edit to the saved grid and hand the notification to the dispatcher.
pub fn run(
    roster: &Roster,
    row: u32,
    column: u32,
    old: Option<String>,
    new: Option<String>,
) -> Result<()> {
    let mut sheet = roster.open_sheet()?;
    let mut log = roster.load_log()?;
    let mut notes = roster.load_notes()?;

    let event = EditEvent { row, column, old_value: old, value: new };
    if event.kind() != EditKind::MassChange {
        let text = event.value.clone().unwrap_or_default();
        sheet.grid_mut().write_cell(row, column, CellValue::text(text));
    }

    let outcome = EditDispatcher::new().handle(&event, &sheet, &mut log, &mut notes)?;
    println!("{}", outcome.render());

    if matches!(outcome, EditOutcome::Skipped) {
        return Ok(());
    }
    // A failed edit keeps its text on the grid; the next sync reports it.
    roster.save_sheet(&sheet)?;
    log.save(&roster.log_path())?;
    notes.save(&roster.notes_path())?;
    Ok(())
}
