use anyhow::Result;
use roster_core::reconcile;
use roster_core::roster::Roster;
use roster_core::survey;

use crate::render::Render;

pub fn run(roster: &Roster) -> Result<()> {
    let sheet = roster.open_sheet()?;
    let mut log = roster.load_log()?;
    let mut notes = roster.load_notes()?;
    let employees = roster.load_employees()?;

    let responses =
        survey::parse_survey(&roster.load_survey()?, &roster.config().survey, &employees)?;
    let (sheet, report) =
        reconcile::place_survey(sheet, &mut log, &mut notes, &employees, &responses)?;

    log.save(&roster.log_path())?;
    notes.save(&roster.notes_path())?;
    roster.save_sheet(&sheet)?;

    println!("{}", report.render());
    Ok(())
}
