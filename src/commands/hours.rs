use anyhow::Result;
use owo_colors::OwoColorize;
use roster_core::date_range::DateRange;
use roster_core::employees::EmployeeDirectory;
use roster_core::log_store::work_minutes_by_employee;
use roster_core::roster::Roster;

pub fn run(roster: &Roster, range: Option<DateRange>) -> Result<()> {
    let range = match range {
        Some(range) => range,
        None => roster.open_sheet()?.range(),
    };
    let log = roster.load_log()?;
    let employees = roster.load_employees()?;

    let totals = work_minutes_by_employee(&log, &range)?;
    println!("Hours {} – {}", range.from.to_string().bold(), range.until.to_string().bold());
    if totals.is_empty() {
        println!("{}", "   No shifts".dimmed());
        return Ok(());
    }

    let width = totals.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let mut sum = 0;
    for (employee, minutes) in &totals {
        sum += minutes;
        let hours = format!("{:>7.2}", f64::from(*minutes) / 60.0);
        let name = format!("{employee:<width$}");
        if employees.is_handle(employee) {
            println!("   {name}  {hours}");
        } else {
            println!("   {}  {hours}", name.red());
        }
    }
    println!("   {}  {:>7.2}", format!("{:<width$}", "Total").bold(), f64::from(sum) / 60.0);
    Ok(())
}
