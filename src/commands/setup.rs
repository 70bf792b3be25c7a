use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use roster_core::date_range::DateRange;
use roster_core::reconcile;
use roster_core::roster::Roster;
use roster_core::schedule::ScheduleSheet;

pub fn run(roster: &Roster, range: DateRange) -> Result<()> {
    let mut log = roster.load_log()?;
    let mut notes = roster.load_notes()?;
    let employees = roster.load_employees()?;

    // Keep edits made on the current sheet before it is replaced.
    let grid = if roster.grid_path().exists() {
        let sheet = roster.open_sheet().context("Could not read the current schedule")?;
        let report = reconcile::sync(&sheet, &mut log)?;
        sheet.save_notes(&mut notes)?;
        if !report.is_empty() {
            println!("Saved {} changed slots from the current schedule", report.0.len());
        }
        sheet.into_grid()
    } else {
        roster.load_grid()?
    };

    let sheet =
        ScheduleSheet::setup(grid, roster.config().layout, range, &log, &notes, &employees)?;
    log.save(&roster.log_path())?;
    notes.save(&roster.notes_path())?;
    roster.save_sheet(&sheet)?;

    let entries = sheet.scan()?.len();
    println!(
        "Schedule set up from {} until {} {}",
        range.from.to_string().bold(),
        range.until.to_string().bold(),
        format!("({entries} filled slots)").dimmed()
    );
    Ok(())
}
