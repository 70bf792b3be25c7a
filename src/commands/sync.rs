use anyhow::Result;
use roster_core::reconcile;
use roster_core::roster::Roster;

use crate::render::render_report;

pub fn run(roster: &Roster) -> Result<()> {
    let sheet = roster.open_sheet()?;
    let mut log = roster.load_log()?;
    let mut notes = roster.load_notes()?;
    let employees = roster.load_employees()?;

    let report = reconcile::sync(&sheet, &mut log)?;
    sheet.save_notes(&mut notes)?;
    log.save(&roster.log_path())?;
    notes.save(&roster.notes_path())?;

    println!("{}", render_report(&report, &employees, false));
    let (added, changed, removed) = report.counts();
    if !report.is_empty() {
        println!("\nSynced {added} added, {changed} changed, {removed} removed");
    }
    Ok(())
}
