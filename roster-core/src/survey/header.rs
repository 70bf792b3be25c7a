//! Decoding of the three merged header rows of a survey table.
//!
//! Each data column sits below a month run ("Mai 2019"), a day run ("Mi 1")
//! and a time run ("9:45 – 14:00"). Runs on different rows are merged
//! independently, so every row gets its own cursor.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{RosterError, RosterResult};
use crate::grid::{CellRun, GridStore};
use crate::time::TimeRange;

const GERMAN_MONTHS: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
    "November", "Dezember",
];

/// Month name to 0-based month index.
static MONTH_INDEX: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| GERMAN_MONTHS.iter().enumerate().map(|(i, &name)| (name, i as u32)).collect());

/// `<name> <number>`, used by both the month and the day header.
static NAME_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+) ([0-9]+)$").expect("valid regex"));

const TIME_SEPARATOR: char = '–';

/// One data column of the survey with its decoded header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyColumn {
    pub column: u32,
    pub date: NaiveDate,
    pub range: TimeRange,
}

/// The runs of one header row from `first_column` to `last_column`. Cells that
/// are not merged come back as runs of a single column.
pub fn decode_runs<G: GridStore>(
    grid: &G,
    row: u32,
    first_column: u32,
    last_column: u32,
) -> Vec<CellRun> {
    let single = |column: u32| CellRun {
        first_column: column,
        last_column: column,
        value: grid.read_cell(row, column),
    };

    let mut runs = Vec::new();
    let mut next = first_column;
    for merged in grid.merged_ranges_of(row, first_column, last_column) {
        runs.extend((next..merged.first_column).map(single));
        next = merged.last_column + 1;
        runs.push(merged);
    }
    runs.extend((next..=last_column).map(single));
    runs
}

/// Move `cursor` forward until its run reaches `column`.
fn run_at<'a>(
    runs: &'a [CellRun],
    cursor: &mut usize,
    column: u32,
    header: &'static str,
) -> RosterResult<&'a CellRun> {
    while runs.get(*cursor).is_some_and(|r| column > r.last_column) {
        *cursor += 1;
    }
    runs.get(*cursor)
        .filter(|r| r.contains(column))
        .ok_or_else(|| RosterError::SurveyHeader { header, column, text: String::new() })
}

fn header_error(header: &'static str, run: &CellRun, column: u32) -> RosterError {
    RosterError::SurveyHeader { header, column, text: run.value.to_string() }
}

/// Year and 0-based month from "Mai 2019".
fn parse_month(run: &CellRun, column: u32) -> RosterResult<(i32, u32)> {
    let text = run.value.to_string();
    let caps = NAME_NUMBER.captures(text.trim()).ok_or_else(|| header_error("month", run, column))?;
    let month = MONTH_INDEX
        .get(&caps[1])
        .copied()
        .ok_or_else(|| header_error("month", run, column))?;
    let year = caps[2].parse().map_err(|_| header_error("month", run, column))?;
    Ok((year, month))
}

/// Day of month from "Mi 1".
fn parse_day(run: &CellRun, column: u32) -> RosterResult<u32> {
    let text = run.value.to_string();
    let caps = NAME_NUMBER.captures(text.trim()).ok_or_else(|| header_error("day", run, column))?;
    caps[2].parse().map_err(|_| header_error("day", run, column))
}

fn parse_time(run: &CellRun, column: u32) -> RosterResult<TimeRange> {
    TimeRange::parse_with(&run.value.to_string(), TIME_SEPARATOR)
        .map_err(|_| header_error("time", run, column))
}

/// Runs up to the last one holding a value.
fn without_empty_tail(runs: &[CellRun]) -> &[CellRun] {
    let end = runs.iter().rposition(|r| !r.value.is_empty()).map_or(0, |i| i + 1);
    &runs[..end]
}

/// Walk the data columns spanned by the month row and decode each one.
///
/// Empty cells after the last month are not part of the table.
pub fn decode_columns(
    months: &[CellRun],
    days: &[CellRun],
    times: &[CellRun],
) -> RosterResult<Vec<SurveyColumn>> {
    let months = without_empty_tail(months);
    let (Some(first), Some(last)) = (months.first(), months.last()) else {
        return Ok(Vec::new());
    };

    let (mut month_cursor, mut day_cursor, mut time_cursor) = (0, 0, 0);
    let mut columns = Vec::new();
    for column in first.first_column..=last.last_column {
        let month_run = run_at(months, &mut month_cursor, column, "month")?;
        let day_run = run_at(days, &mut day_cursor, column, "day")?;
        let time_run = run_at(times, &mut time_cursor, column, "time")?;

        let (year, month) = parse_month(month_run, column)?;
        let day = parse_day(day_run, column)?;
        let date = NaiveDate::from_ymd_opt(year, month + 1, day)
            .ok_or_else(|| header_error("day", day_run, column))?;
        let range = parse_time(time_run, column)?;

        tracing::debug!(column, %date, %range, "decoded survey column");
        columns.push(SurveyColumn { column, date, range });
    }
    Ok(columns)
}
