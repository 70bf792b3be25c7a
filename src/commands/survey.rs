use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use roster_core::roster::Roster;
use roster_core::survey;

use crate::render::Render;

pub fn run(roster: &Roster) -> Result<()> {
    let grid = roster.load_survey()?;
    let employees = roster.load_employees()?;

    let responses = survey::parse_survey(&grid, &roster.config().survey, &employees)
        .with_context(|| format!("Could not read survey {}", roster.survey_path().display()))?;
    let unique = survey::unique_longest(&responses);

    if unique.is_empty() {
        println!("{}", "No responses".dimmed());
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for response in &unique {
        if current != Some(response.employee.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("{}", response.employee.bold());
            current = Some(response.employee.as_str());
        }
        println!("   {}", response.render());
    }

    println!("\n{} responses, {} after keeping the longest per day", responses.len(), unique.len());
    Ok(())
}
