mod commands;
mod render;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roster_core::date_range::DateRange;
use roster_core::roster::Roster;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Keep a shift roster grid and its assignment log in sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the roster directory and a default roster.toml
    Init,
    /// Sync the current sheet, then lay out the grid for a new range
    Setup {
        /// First date (YYYY-MM-DD), or a month (YYYY-MM) for it and the next one
        #[arg(long)]
        from: String,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },
    /// Show where the grid and the log disagree
    Status,
    /// Write grid changes into the log
    Sync,
    /// Feed one cell edit through the edit dispatcher
    Edit {
        row: u32,
        column: u32,

        /// Cell text before the edit
        #[arg(long)]
        old: Option<String>,

        /// Cell text after the edit. Leave out both for a bulk edit.
        #[arg(long)]
        new: Option<String>,
    },
    /// Parse the imported survey and list each employee's availability
    Survey,
    /// Place survey responses onto the schedule
    Place,
    /// Put employees on one slot and take them off every other slot that day
    Assign {
        /// Date (YYYY-MM-DD)
        date: String,
        location: String,
        shift: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Paid hours per employee
    Hours {
        /// First date (YYYY-MM-DD) or month (YYYY-MM), defaults to the sheet's range
        #[arg(long)]
        from: Option<String>,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Setup { from, until } => {
            let range = DateRange::from_args(&from, until.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::setup::run(&load_roster()?, range)
        }
        Commands::Status => commands::status::run(&load_roster()?),
        Commands::Sync => commands::sync::run(&load_roster()?),
        Commands::Edit { row, column, old, new } => {
            commands::edit::run(&load_roster()?, row, column, old, new)
        }
        Commands::Survey => commands::survey::run(&load_roster()?),
        Commands::Place => commands::place::run(&load_roster()?),
        Commands::Assign { date, location, shift, names } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{date}'. Expected YYYY-MM-DD"))?;
            commands::assign::run(&load_roster()?, date, &location, &shift, &names)
        }
        Commands::Hours { from, until } => {
            let range = from
                .map(|from| DateRange::from_args(&from, until.as_deref()))
                .transpose()
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::hours::run(&load_roster()?, range)
        }
    }
}

fn load_roster() -> Result<Roster> {
    let roster = Roster::load()?;

    if !roster.dir().exists() {
        anyhow::bail!(
            "No roster found at {}.\n\n\
            Create one with:\n  \
            roster init",
            roster.dir().display()
        );
    }

    tracing::debug!(dir = %roster.dir().display(), "using roster");
    Ok(roster)
}
