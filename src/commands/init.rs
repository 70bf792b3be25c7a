use anyhow::Result;
use owo_colors::OwoColorize;
use roster_core::config::{GlobalConfig, ROSTER_CONFIG_FILE};
use roster_core::roster::Roster;

pub fn run() -> Result<()> {
    let config_path = GlobalConfig::config_path()?;
    let global = GlobalConfig::load()?;
    let (roster, created) = Roster::init(global.roster_dir())?;

    if created {
        println!("Created {}", roster.dir().join(ROSTER_CONFIG_FILE).display().green());
    } else {
        println!("{}", "Roster already initialized".dimmed());
    }

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Roster:     {}", roster.dir().display());
    println!("  Employees:  {}", roster.employees_path().display());
    println!("  Survey:     {}", roster.survey_path().display());
    println!("\nNext, add employees and run:\n  roster setup --from <YYYY-MM>");

    Ok(())
}
