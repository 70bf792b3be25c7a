use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use roster_core::reconcile;
use roster_core::roster::Roster;
use roster_core::slot::Slot;

use crate::render::render_items;

pub fn run(
    roster: &Roster,
    date: NaiveDate,
    location: &str,
    shift: &str,
    names: &[String],
) -> Result<()> {
    let mut sheet = roster.open_sheet()?;
    let mut log = roster.load_log()?;
    let employees = roster.load_employees()?;

    let slot = Slot::lookup(date, location, shift)?;
    if sheet.mapper().slot_to_cell(&slot).is_none() {
        let range = sheet.range();
        anyhow::bail!("{} is outside the schedule ({} – {})", date, range.from, range.until);
    }

    let changed = sheet.assign_exclusive(&slot, names)?;
    let report = reconcile::sync(&sheet, &mut log)?;
    roster.save_sheet(&sheet)?;
    log.save(&roster.log_path())?;

    if changed.is_empty() {
        println!("{}", "Nothing changed".dimmed());
        return Ok(());
    }
    for slot in changed {
        let entry = sheet.entry_at(&slot)?;
        let items = entry.map(|e| e.employees).unwrap_or_default();
        println!("   {} {}", slot, render_items(&items, &employees));
    }
    let (added, changed, removed) = report.counts();
    println!("\nLog: {added} added, {changed} changed, {removed} removed");
    Ok(())
}
