//! Terminal rendering for roster types.
//!
//! Extension traits that add colored output to roster-core types using owo_colors.

use owo_colors::OwoColorize;
use roster_core::dispatch::EditOutcome;
use roster_core::employees::EmployeeDirectory;
use roster_core::reconcile::{DiffKind, PlacementReport, SlotDiff, SyncReport};
use roster_core::slot_text::Item;
use roster_core::survey::SurveyResponse;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.to_string();
        match self {
            DiffKind::Added => symbol.green().to_string(),
            DiffKind::Changed => symbol.yellow().to_string(),
            DiffKind::Removed => symbol.red().to_string(),
        }
    }
}

/// Employee names joined by commas. Names the directory does not know as a
/// handle are shown in bold red.
pub fn render_items(items: &[Item], employees: &dyn EmployeeDirectory) -> String {
    items
        .iter()
        .map(|item| {
            if employees.is_handle(item.name()) {
                item.to_string()
            } else {
                item.to_string().red().bold().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_diff(diff: &SlotDiff, employees: &dyn EmployeeDirectory) -> String {
    let log_side = render_items(&diff.employees_in_log, employees);
    let grid_side = render_items(&diff.employees_in_grid, employees);
    let slot = diff.slot.to_string();
    match diff.kind() {
        DiffKind::Added => format!("{} {} {}", diff.kind().render(), slot, grid_side),
        DiffKind::Removed => {
            format!("{} {} {}", diff.kind().render(), slot, log_side.strikethrough())
        }
        DiffKind::Changed => {
            format!(
                "{} {} {} {} {}",
                diff.kind().render(),
                slot,
                log_side,
                "→".dimmed(),
                grid_side
            )
        }
    }
}

/// Threshold for compact view (show counts instead of individual slots)
const COMPACT_THRESHOLD: usize = 12;

pub fn render_report(
    report: &SyncReport,
    employees: &dyn EmployeeDirectory,
    verbose: bool,
) -> String {
    if report.is_empty() {
        return "   No changes".dimmed().to_string();
    }

    if verbose || report.0.len() <= COMPACT_THRESHOLD {
        return report
            .0
            .iter()
            .map(|d| format!("   {}", render_diff(d, employees)))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let (added, changed, removed) = report.counts();
    let mut lines = Vec::new();
    if added > 0 {
        let label = format!("({} new {})", added, pluralize(added));
        lines.push(format!("   {} {}", "+".green(), label.green()));
    }
    if changed > 0 {
        let label = format!("({} changed {})", changed, pluralize(changed));
        lines.push(format!("   {} {}", "~".yellow(), label.yellow()));
    }
    if removed > 0 {
        let label = format!("({} removed {})", removed, pluralize(removed));
        lines.push(format!("   {} {}", "-".red(), label.red()));
    }
    lines.join("\n")
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "slot" } else { "slots" }
}

impl Render for SurveyResponse {
    fn render(&self) -> String {
        let hours = f64::from(self.work_minutes()) / 60.0;
        format!(
            "{} {} {} {}",
            self.date,
            self.shift.name,
            self.range.to_string().dimmed(),
            format!("({hours:.2} h)").dimmed()
        )
    }
}

impl Render for PlacementReport {
    fn render(&self) -> String {
        let mut line = format!("Placed {}", self.placed.to_string().green());
        if self.already_placed > 0 {
            line.push_str(&format!(", {} already on the schedule", self.already_placed));
        }
        if self.unassigned > 0 {
            line.push_str(&format!(", {} without location", self.unassigned.to_string().yellow()));
        }
        if self.out_of_range > 0 {
            let skipped = format!(", {} outside the range", self.out_of_range);
            line.push_str(&skipped.dimmed().to_string());
        }
        line
    }
}

impl Render for EditOutcome {
    fn render(&self) -> String {
        match self {
            EditOutcome::Skipped => "Skipped, another edit is in progress".yellow().to_string(),
            EditOutcome::Synced(report) => {
                let (added, changed, removed) = report.counts();
                format!("Synced {added} added, {changed} changed, {removed} removed")
            }
            EditOutcome::SlotUpdated(entry) => format!("{} {}", "~".yellow(), entry),
            EditOutcome::NoteUpdated { date, index } => format!("Note {} #{}", date, index + 1),
            EditOutcome::Inert => "Nothing to do for this cell".dimmed().to_string(),
            EditOutcome::Failed(e) => e.red().to_string(),
        }
    }
}
