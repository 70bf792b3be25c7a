//! Availability survey import.
//!
//! The survey table has three merged header rows (month, day, time) and one
//! row per employee below, marking each column they are available for. The
//! responses end at an empty name or at the summary row.

mod header;

use std::fmt;

use chrono::NaiveDate;

pub use header::{SurveyColumn, decode_columns, decode_runs};

use crate::config::SurveyLayout;
use crate::employees::EmployeeDirectory;
use crate::error::{RosterError, RosterResult};
use crate::grid::GridStore;
use crate::shift::{Shift, ShiftKind, inferred_break_minutes};
use crate::slot_text::Item;
use crate::time::TimeRange;

/// One employee available on one date for one time range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyResponse {
    pub employee: String,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub shift: &'static Shift,
}

impl SurveyResponse {
    pub fn duration_minutes(&self) -> u16 {
        self.range.duration_minutes()
    }

    pub fn break_minutes(&self) -> u16 {
        inferred_break_minutes(self.range)
    }

    pub fn work_minutes(&self) -> u16 {
        self.duration_minutes() - self.break_minutes()
    }

    /// Cell item for this response. The hours are only written out when they
    /// and the break differ from the shift's.
    pub fn item(&self) -> Item {
        let exact = Shift::by_times(self.range.start, self.range.stop, self.break_minutes());
        if exact == Some(self.shift) {
            Item::named(self.employee.clone())
        } else {
            Item::Specified { name: self.employee.clone(), range: self.range }
        }
    }
}

impl fmt::Display for SurveyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ({})", self.employee, self.date, self.shift.name, self.range)
    }
}

/// Catalog shift for a survey time range, matched by start and stop hour.
pub fn resolve_shift(range: TimeRange) -> RosterResult<&'static Shift> {
    let (start, stop) = (range.start.hours(), range.stop.hours());
    let kind = match start {
        9 | 10 if stop == 14 => ShiftKind::Morning,
        9 | 10 if stop > 14 => ShiftKind::WholeDay,
        13 => ShiftKind::Afternoon,
        _ => {
            return Err(RosterError::UnresolvableShift {
                start: range.start.to_string(),
                stop: range.stop.to_string(),
            });
        }
    };
    Ok(Shift::by_kind(kind))
}

/// Parse the survey table into responses sorted by employee, then date.
pub fn parse_survey<G: GridStore>(
    grid: &G,
    layout: &SurveyLayout,
    employees: &dyn EmployeeDirectory,
) -> RosterResult<Vec<SurveyResponse>> {
    let last_column = grid.last_column();
    let months = decode_runs(grid, layout.month_row, layout.first_column, last_column);
    let days = decode_runs(grid, layout.day_row, layout.first_column, last_column);
    let times = decode_runs(grid, layout.time_row, layout.first_column, last_column);
    let columns = decode_columns(&months, &days, &times)?;

    let mut responses = Vec::new();
    for row in layout.first_response_row..=grid.last_row() {
        let name = grid.read_cell(row, layout.name_column).to_string();
        let name = name.trim();
        if name.is_empty() || name == layout.summary_label {
            break;
        }
        let employee = employees.require(name)?.handle.clone();

        for column in &columns {
            let marker = grid.read_cell(row, column.column).to_string();
            if marker.trim() != layout.available_marker {
                continue;
            }
            responses.push(SurveyResponse {
                employee: employee.clone(),
                date: column.date,
                range: column.range,
                shift: resolve_shift(column.range)?,
            });
        }
    }

    responses.sort_by(|a, b| (&a.employee, a.date).cmp(&(&b.employee, b.date)));
    tracing::debug!(count = responses.len(), "parsed survey responses");
    Ok(responses)
}

/// One response per employee and date, keeping the longest. Ties keep the
/// first. Input must be sorted by employee and date.
pub fn unique_longest(responses: &[SurveyResponse]) -> Vec<SurveyResponse> {
    let mut unique: Vec<SurveyResponse> = Vec::new();
    for response in responses {
        match unique.last_mut() {
            Some(last) if last.employee == response.employee && last.date == response.date => {
                if response.duration_minutes() > last.duration_minutes() {
                    *last = response.clone();
                }
            }
            _ => unique.push(response.clone()),
        }
    }
    unique
}
