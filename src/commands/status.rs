use std::collections::BTreeSet;

use anyhow::Result;
use owo_colors::OwoColorize;
use roster_core::employees::EmployeeDirectory;
use roster_core::reconcile::{self, SyncReport};
use roster_core::roster::Roster;

use crate::render::render_report;

pub fn run(roster: &Roster) -> Result<()> {
    let sheet = roster.open_sheet()?;
    let log = roster.load_log()?;
    let employees = roster.load_employees()?;

    let range = sheet.range();
    println!("Schedule {} – {}", range.from.to_string().bold(), range.until.to_string().bold());

    let report = SyncReport(reconcile::pending(&sheet, &log)?);
    println!("{}", render_report(&report, &employees, true));

    let unknown: BTreeSet<String> = sheet
        .scan()?
        .iter()
        .flat_map(|e| e.employee_names())
        .filter(|name| !employees.is_handle(name))
        .map(String::from)
        .collect();
    if !unknown.is_empty() {
        let names: Vec<_> = unknown.into_iter().collect();
        println!("\n{} {}", "Unknown employees:".red(), names.join(", "));
    }

    Ok(())
}
