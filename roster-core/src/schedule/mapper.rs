//! Translation between grid cells and slots.
//!
//! Each date owns a block of two rows, each location a block of three columns
//! (two data columns and an empty gutter). Inside a block the whole day shift
//! sits in the merged top row and the morning and afternoon shifts share the
//! bottom row:
//!
//! ```text
//!            location 0        location 1
//!          +-------------+   +-------------+
//! date 0   |  WholeDay   |   |  WholeDay   |
//!          | Morn | Aftn |   | Morn | Aftn |
//!          +-------------+   +-------------+
//! ```

use chrono::NaiveDate;

use crate::config::Layout;
use crate::date_range::{DateRange, days_between};
use crate::location::Location;
use crate::shift::{Shift, ShiftKind};
use crate::slot::{Place, Slot};

pub const ROWS_PER_ENTRY_BLOCK: u32 = 2;
pub const DATA_COLUMNS_PER_LOCATION: u32 = 2;
pub const COLUMNS_PER_LOCATION_BLOCK: u32 = DATA_COLUMNS_PER_LOCATION + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMapper {
    pub layout: Layout,
    pub range: DateRange,
}

impl GridMapper {
    pub fn new(layout: Layout, range: DateRange) -> Self {
        GridMapper { layout, range }
    }

    /// Top row of the block for `date`, None outside the range.
    pub fn date_to_row(&self, date: NaiveDate) -> Option<u32> {
        if !self.range.contains(date) {
            return None;
        }
        let days = days_between(self.range.from, date) as u32;
        Some(self.layout.first_entry_row + days * ROWS_PER_ENTRY_BLOCK)
    }

    /// Date of the block containing `row`.
    pub fn row_to_date(&self, row: u32) -> Option<NaiveDate> {
        let offset = row.checked_sub(self.layout.first_entry_row)?;
        self.range.nth_day(offset / ROWS_PER_ENTRY_BLOCK)
    }

    /// Leftmost column of the block for `location`.
    pub fn location_to_column(&self, location: &Location) -> u32 {
        self.layout.first_entry_column + location.index * COLUMNS_PER_LOCATION_BLOCK
    }

    /// Top left cell of a place's block.
    pub fn place_to_cell(&self, place: &Place) -> Option<CellPos> {
        Some(CellPos {
            row: self.date_to_row(place.date)?,
            column: self.location_to_column(place.location),
        })
    }

    /// Cell holding `slot`, None when its date is outside the range.
    pub fn slot_to_cell(&self, slot: &Slot) -> Option<CellPos> {
        let top_left = self.place_to_cell(&slot.place())?;
        let (row_offset, column_offset) = slot.shift.display_offset();
        Some(CellPos {
            row: top_left.row + row_offset,
            column: top_left.column + column_offset,
        })
    }

    /// Slot held by a cell, None for cells outside the entry region, gutters,
    /// and positions no shift is displayed at.
    pub fn cell_to_slot(&self, row: u32, column: u32) -> Option<Slot> {
        let date = self.row_to_date(row)?;
        let relative_column = column.checked_sub(self.layout.first_entry_column)?;
        let location = Location::by_index(relative_column / COLUMNS_PER_LOCATION_BLOCK)?;
        let column_part = relative_column % COLUMNS_PER_LOCATION_BLOCK;
        if column_part == DATA_COLUMNS_PER_LOCATION {
            return None;
        }
        let row_part = (row - self.layout.first_entry_row) % ROWS_PER_ENTRY_BLOCK;

        match ShiftKind::from_display_offset(row_part, column_part) {
            Some(kind) => Some(Slot::new(date, location, Shift::by_kind(kind))),
            None => {
                tracing::warn!(row, column, "inconsistent cell: no shift is displayed here");
                None
            }
        }
    }

    /// Column right of the last location block holding the notes.
    pub fn note_column(&self) -> u32 {
        self.layout.first_entry_column
            + Location::all().len() as u32 * COLUMNS_PER_LOCATION_BLOCK
            + 1
    }

    /// Date and note index for a row of the note column.
    pub fn note_at(&self, row: u32) -> Option<(NaiveDate, u32)> {
        let date = self.row_to_date(row)?;
        let top = self.date_to_row(date)?;
        Some((date, row - top))
    }

    /// Number of rows the entry region spans.
    pub fn entry_rows(&self) -> u32 {
        self.range.len_days() * ROWS_PER_ENTRY_BLOCK
    }

    /// Every slot in range, in slot order.
    pub fn slots(&self) -> Vec<Slot> {
        let locations = Location::by_name_order();
        let mut slots = Vec::new();
        for date in self.range.days() {
            for &location in &locations {
                for &shift in Shift::by_name_order() {
                    slots.push(Slot::new(date, location, shift));
                }
            }
        }
        slots
    }
}
