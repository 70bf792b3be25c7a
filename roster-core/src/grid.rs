//! Two-dimensional cell stores: the schedule grid and the imported survey table.
//!
//! Rows and columns are 1-based, as in a spreadsheet.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::fs;

/// Value held by one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() { CellValue::Empty } else { CellValue::Text(s) }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Date(_) => "date",
        }
    }

    fn conversion_error(&self, expected: &'static str, row: u32, column: u32) -> RosterError {
        RosterError::ValueConversion {
            expected,
            got: format!("{} '{}'", self.kind(), self),
            row,
            column,
        }
    }

    /// Text content; an empty cell reads as the empty string.
    pub fn expect_text(&self, row: u32, column: u32) -> RosterResult<String> {
        match self {
            CellValue::Empty => Ok(String::new()),
            CellValue::Text(s) => Ok(s.clone()),
            _ => Err(self.conversion_error("text", row, column)),
        }
    }

    pub fn expect_date(&self, row: u32, column: u32) -> RosterResult<NaiveDate> {
        match self {
            CellValue::Date(d) => Ok(*d),
            _ => Err(self.conversion_error("date", row, column)),
        }
    }

    pub fn expect_number(&self, row: u32, column: u32) -> RosterResult<f64> {
        match self {
            CellValue::Number(n) => Ok(*n),
            _ => Err(self.conversion_error("number", row, column)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// A run of merged cells on one row, or a single cell when `first_column == last_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRun {
    pub first_column: u32,
    pub last_column: u32,
    pub value: CellValue,
}

impl CellRun {
    pub fn contains(&self, column: u32) -> bool {
        self.first_column <= column && column <= self.last_column
    }
}

/// The cell store the schedule and survey are read from and written to.
pub trait GridStore {
    fn read_cell(&self, row: u32, column: u32) -> CellValue;

    /// Write a block of values with its top left corner at (row, column).
    fn write_cells(&mut self, row: u32, column: u32, values: Vec<Vec<CellValue>>);

    /// Merged runs on `row` overlapping `first_column..=last_column`, ordered by column.
    /// Cells that are not part of a merge are not reported.
    fn merged_ranges_of(&self, row: u32, first_column: u32, last_column: u32) -> Vec<CellRun>;

    fn merge_across(&mut self, row: u32, first_column: u32, last_column: u32);

    fn last_row(&self) -> u32;

    fn last_column(&self) -> u32;

    fn clear(&mut self);

    fn write_cell(&mut self, row: u32, column: u32, value: CellValue) {
        self.write_cells(row, column, vec![vec![value]]);
    }

    fn read_text(&self, row: u32, column: u32) -> RosterResult<String> {
        self.read_cell(row, column).expect_text(row, column)
    }

    fn read_date(&self, row: u32, column: u32) -> RosterResult<NaiveDate> {
        self.read_cell(row, column).expect_date(row, column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Merge {
    row: u32,
    first_column: u32,
    last_column: u32,
}

/// Grid held in memory and persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryGrid {
    /// `rows[r][c]` is the cell at row `r + 1`, column `c + 1`.
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    merges: Vec<Merge>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid of text cells, empty strings become empty cells.
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        MemoryGrid {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| CellValue::text(*s)).collect())
                .collect(),
            merges: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> RosterResult<Self> {
        fs::load_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> RosterResult<()> {
        fs::save_json(path, self)
    }

    fn merge_at(&self, row: u32, column: u32) -> Option<&Merge> {
        self.merges
            .iter()
            .find(|m| m.row == row && m.first_column <= column && column <= m.last_column)
    }

    fn raw(&self, row: u32, column: u32) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(column as usize - 1))
            .cloned()
            .unwrap_or_default()
    }
}

impl GridStore for MemoryGrid {
    fn read_cell(&self, row: u32, column: u32) -> CellValue {
        match self.merge_at(row, column) {
            Some(m) if m.first_column != column => CellValue::Empty,
            _ => self.raw(row, column),
        }
    }

    fn write_cells(&mut self, row: u32, column: u32, values: Vec<Vec<CellValue>>) {
        if row == 0 || column == 0 {
            return;
        }
        for (dr, line) in values.into_iter().enumerate() {
            let r = row as usize - 1 + dr;
            if self.rows.len() <= r {
                self.rows.resize_with(r + 1, Vec::new);
            }
            for (dc, value) in line.into_iter().enumerate() {
                let c = column as usize - 1 + dc;
                let cells = &mut self.rows[r];
                if cells.len() <= c {
                    cells.resize_with(c + 1, CellValue::default);
                }
                cells[c] = value;
            }
        }
    }

    fn merged_ranges_of(&self, row: u32, first_column: u32, last_column: u32) -> Vec<CellRun> {
        let mut runs: Vec<CellRun> = self
            .merges
            .iter()
            .filter(|m| {
                m.row == row && m.last_column >= first_column && m.first_column <= last_column
            })
            .map(|m| CellRun {
                first_column: m.first_column,
                last_column: m.last_column,
                value: self.raw(row, m.first_column),
            })
            .collect();
        runs.sort_by_key(|r| r.first_column);
        runs
    }

    fn merge_across(&mut self, row: u32, first_column: u32, last_column: u32) {
        if last_column <= first_column {
            return;
        }
        self.merges.retain(|m| {
            m.row != row || m.last_column < first_column || m.first_column > last_column
        });
        self.merges.push(Merge { row, first_column, last_column });
    }

    fn last_row(&self) -> u32 {
        self.rows
            .iter()
            .rposition(|r| r.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i as u32 + 1)
    }

    fn last_column(&self) -> u32 {
        self.rows
            .iter()
            .filter_map(|r| r.iter().rposition(|c| !c.is_empty()))
            .max()
            .map_or(0, |i| i as u32 + 1)
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.merges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_and_bounds() {
        let mut grid = MemoryGrid::new();
        grid.write_cells(2, 3, vec![vec![CellValue::text("a"), CellValue::text("b")]]);
        assert_eq!(grid.read_cell(2, 3), CellValue::text("a"));
        assert_eq!(grid.read_cell(2, 4), CellValue::text("b"));
        assert_eq!(grid.read_cell(9, 9), CellValue::Empty);
        assert_eq!(grid.read_cell(0, 1), CellValue::Empty);
        assert_eq!(grid.last_row(), 2);
        assert_eq!(grid.last_column(), 4);
    }

    #[test]
    fn test_merged_cells_read_empty_after_first() {
        let mut grid = MemoryGrid::from_text_rows(&[&["x", "Mai 2019", "", ""]]);
        grid.merge_across(1, 2, 4);
        assert_eq!(grid.read_cell(1, 2), CellValue::text("Mai 2019"));
        assert_eq!(grid.read_cell(1, 3), CellValue::Empty);

        let runs = grid.merged_ranges_of(1, 1, 10);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].first_column, 2);
        assert_eq!(runs[0].last_column, 4);
        assert_eq!(runs[0].value, CellValue::text("Mai 2019"));
    }

    #[test]
    fn test_value_conversion_error_carries_position() {
        let grid = MemoryGrid::from_text_rows(&[&["Von", "soon"]]);
        match grid.read_date(1, 2) {
            Err(RosterError::ValueConversion { expected, row, column, .. }) => {
                assert_eq!(expected, "date");
                assert_eq!((row, column), (1, 2));
            }
            other => panic!("Expected ValueConversion, got {:?}", other),
        }
        assert!(grid.read_text(1, 2).is_ok());
    }

    #[test]
    fn test_json_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");

        let mut grid = MemoryGrid::new();
        grid.write_cell(1, 2, CellValue::Date(NaiveDate::from_ymd_opt(2019, 5, 1).unwrap()));
        grid.write_cell(3, 7, CellValue::text("Alice"));
        grid.merge_across(3, 7, 8);
        grid.save(&path).unwrap();

        let loaded = MemoryGrid::load(&path).unwrap();
        assert_eq!(loaded.read_date(1, 2).unwrap(), NaiveDate::from_ymd_opt(2019, 5, 1).unwrap());
        assert_eq!(loaded.read_text(3, 7).unwrap(), "Alice");
        assert_eq!(loaded.merged_ranges_of(3, 1, 10).len(), 1);

        let missing = MemoryGrid::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(missing.last_row(), 0);
    }
}
