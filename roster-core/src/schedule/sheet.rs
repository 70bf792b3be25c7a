//! The schedule sheet: a grid laid out by a [`GridMapper`], with a header,
//! an employee pane on the left and a notes column on the right.

use std::collections::HashMap;

use crate::config::Layout;
use crate::date_range::DateRange;
use crate::employees::EmployeeDirectory;
use crate::error::{RosterError, RosterResult};
use crate::grid::{CellValue, GridStore};
use crate::location::Location;
use crate::log_store::{LogStore, work_minutes_by_employee};
use crate::notes::{Note, NoteStore};
use crate::schedule::mapper::{CellPos, GridMapper, ROWS_PER_ENTRY_BLOCK};
use crate::slot::{Entry, Slot, compare_slots};
use crate::slot_text;

/// Header cells holding the range: "Von" <from> "bis" <until>.
const RANGE_ROW: u32 = 1;
const FROM_COLUMN: u32 = 2;
const UNTIL_COLUMN: u32 = 4;

/// Columns of the employee pane.
const EMPLOYEE_COLUMN: u32 = 1;
const ASSIGNED_LOCATION_COLUMN: u32 = 3;

pub struct ScheduleSheet<G: GridStore> {
    grid: G,
    mapper: GridMapper,
}

impl<G: GridStore> ScheduleSheet<G> {
    /// Open a sheet that was set up before, reading its range from the header.
    pub fn open(grid: G, layout: Layout) -> RosterResult<Self> {
        layout.validate()?;
        let from = grid.read_date(RANGE_ROW, FROM_COLUMN)?;
        let until = grid.read_date(RANGE_ROW, UNTIL_COLUMN)?;
        let range = DateRange::new(from, until).map_err(RosterError::Config)?;
        Ok(ScheduleSheet { grid, mapper: GridMapper::new(layout, range) })
    }

    /// Lay out an empty sheet for `range` and fill it from the log and notes.
    ///
    /// Location assignments in the employee pane survive the rebuild.
    pub fn setup(
        mut grid: G,
        layout: Layout,
        range: DateRange,
        log: &dyn LogStore,
        notes: &dyn NoteStore,
        employees: &dyn EmployeeDirectory,
    ) -> RosterResult<Self> {
        layout.validate()?;
        let assignments = read_assignments(&grid, layout.first_entry_row, employees)?;
        grid.clear();
        let mut sheet = ScheduleSheet { grid, mapper: GridMapper::new(layout, range) };
        sheet.write_header();
        sheet.write_employee_pane(log, employees, &assignments)?;
        sheet.write_date_blocks();
        sheet.write_notes(notes)?;
        let entries = log.entries_in(&range)?;
        sheet.place_entries(&entries);
        Ok(sheet)
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn into_grid(self) -> G {
        self.grid
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn range(&self) -> DateRange {
        self.mapper.range
    }

    fn write_header(&mut self) {
        let range = self.mapper.range;
        self.grid.write_cells(
            RANGE_ROW,
            1,
            vec![vec![
                CellValue::text("Von"),
                CellValue::Date(range.from),
                CellValue::text("bis"),
                CellValue::Date(range.until),
            ]],
        );
        for location in Location::all() {
            let column = self.mapper.location_to_column(location);
            self.grid.write_cell(RANGE_ROW, column, CellValue::text(location.name));
        }
        let note_column = self.mapper.note_column();
        self.grid.write_cell(RANGE_ROW, note_column, CellValue::text("Notizen"));
    }

    fn write_employee_pane(
        &mut self,
        log: &dyn LogStore,
        employees: &dyn EmployeeDirectory,
        assignments: &HashMap<String, String>,
    ) -> RosterResult<()> {
        let first = self.mapper.layout.first_entry_row;
        self.grid.write_cells(
            first - 1,
            EMPLOYEE_COLUMN,
            vec![vec![
                CellValue::text("Mitarbeiter"),
                CellValue::text("Stunden"),
                CellValue::Empty,
            ]],
        );

        let minutes: HashMap<String, u32> =
            work_minutes_by_employee(log, &self.mapper.range)?.into_iter().collect();
        let rows = employees
            .employees()
            .iter()
            .map(|e| {
                let worked = minutes.get(&e.handle).copied().unwrap_or(0);
                let location = assignments.get(&e.handle).cloned().unwrap_or_default();
                vec![
                    CellValue::text(e.handle.clone()),
                    CellValue::Number(f64::from(worked) / 60.0),
                    CellValue::text(location),
                ]
            })
            .collect();
        self.grid.write_cells(first, EMPLOYEE_COLUMN, rows);
        Ok(())
    }

    fn write_date_blocks(&mut self) {
        let index_column = self.mapper.layout.index_column;
        for date in self.mapper.range.days() {
            let Some(row) = self.mapper.date_to_row(date) else { continue };
            self.grid.write_cell(row, index_column, CellValue::Date(date));
            for location in Location::all() {
                let column = self.mapper.location_to_column(location);
                self.grid.merge_across(row, column, column + 1);
            }
        }
    }

    fn write_notes(&mut self, notes: &dyn NoteStore) -> RosterResult<()> {
        let column = self.mapper.note_column();
        for note in notes.notes_in(&self.mapper.range)? {
            if note.index >= ROWS_PER_ENTRY_BLOCK {
                tracing::warn!(
                    date = %note.date,
                    index = note.index,
                    "note index outside the date block"
                );
                continue;
            }
            if let Some(row) = self.mapper.date_to_row(note.date) {
                self.grid.write_cell(row + note.index, column, CellValue::text(note.text));
            }
        }
        Ok(())
    }

    /// Write entries into their cells. Entries outside the range are skipped.
    pub fn place_entries(&mut self, entries: &[Entry]) {
        for entry in entries {
            if let Some(cell) = self.mapper.slot_to_cell(&entry.slot) {
                tracing::debug!(%entry, row = cell.row, column = cell.column, "placing entry");
                self.grid.write_cell(cell.row, cell.column, CellValue::text(entry.cell_text()));
            }
        }
    }

    fn cell_text(&self, cell: CellPos) -> RosterResult<String> {
        self.grid.read_text(cell.row, cell.column)
    }

    /// Parsed content of one slot's cell, None if the slot is outside the range.
    pub fn entry_at(&self, slot: &Slot) -> RosterResult<Option<Entry>> {
        let Some(cell) = self.mapper.slot_to_cell(slot) else {
            return Ok(None);
        };
        let items = slot_text::parse_normalized(&self.cell_text(cell)?)?;
        Ok(Some(Entry { slot: *slot, employees: items }))
    }

    /// Every non-empty slot on the sheet, in slot order.
    pub fn scan(&self) -> RosterResult<Vec<Entry>> {
        let mut entries = Vec::new();
        for slot in self.mapper.slots() {
            if let Some(entry) = self.entry_at(&slot)? {
                if !entry.is_empty() {
                    entries.push(entry);
                }
            }
        }
        debug_assert!(entries.windows(2).all(|w| compare_slots(&w[0].slot, &w[1].slot).is_lt()));
        Ok(entries)
    }

    /// Notes currently written in the notes column.
    pub fn scan_notes(&self) -> RosterResult<Vec<Note>> {
        let column = self.mapper.note_column();
        let first = self.mapper.layout.first_entry_row;
        let mut notes = Vec::new();
        for row in first..first + self.mapper.entry_rows() {
            let text = self.grid.read_text(row, column)?;
            if text.trim().is_empty() {
                continue;
            }
            if let Some((date, index)) = self.mapper.note_at(row) {
                notes.push(Note { date, index, text });
            }
        }
        Ok(notes)
    }

    /// Replace the note store's notes for the sheet's range with the sheet's notes.
    pub fn save_notes(&self, store: &mut dyn NoteStore) -> RosterResult<()> {
        let notes = self.scan_notes()?;
        let range = self.mapper.range;
        store.replace_range(range.from, range.until, notes)
    }

    /// Location each employee in the pane is assigned to for survey placement.
    pub fn employees_and_locations(
        &self,
        employees: &dyn EmployeeDirectory,
    ) -> RosterResult<HashMap<String, &'static Location>> {
        read_assignments(&self.grid, self.mapper.layout.first_entry_row, employees)?
            .into_iter()
            .map(|(employee, location)| Ok((employee, Location::require(&location)?)))
            .collect()
    }

    /// Overwrite one slot's cell.
    pub fn write_slot(&mut self, slot: &Slot, text: &str) -> bool {
        match self.mapper.slot_to_cell(slot) {
            Some(cell) => {
                self.grid.write_cell(cell.row, cell.column, CellValue::text(text));
                true
            }
            None => false,
        }
    }

    /// Put `names` on `slot` and take them off every other slot of the same date.
    /// Returns the slots whose cells changed.
    pub fn assign_exclusive<S: AsRef<str>>(
        &mut self,
        slot: &Slot,
        names: &[S],
    ) -> RosterResult<Vec<Slot>> {
        let Some(target) = self.mapper.slot_to_cell(slot) else {
            return Ok(vec![]);
        };
        let mut changed = Vec::new();

        for other in self.mapper.slots().into_iter().filter(|s| s.date == slot.date && s != slot) {
            let Some(cell) = self.mapper.slot_to_cell(&other) else { continue };
            let before = self.cell_text(cell)?;
            let after = slot_text::remove_employees(&before, names);
            if after != before {
                self.grid.write_cell(cell.row, cell.column, CellValue::text(after));
                changed.push(other);
            }
        }

        let before = self.cell_text(target)?;
        let after = slot_text::add_employees(&before, names)?;
        if after != before {
            self.grid.write_cell(target.row, target.column, CellValue::text(after));
            changed.push(*slot);
        }
        Ok(changed)
    }
}

/// Employee to location name, as written in the employee pane.
fn read_assignments<G: GridStore>(
    grid: &G,
    first_row: u32,
    employees: &dyn EmployeeDirectory,
) -> RosterResult<HashMap<String, String>> {
    let mut result = HashMap::new();
    for row in first_row..first_row + employees.employees().len() as u32 {
        let employee = grid.read_text(row, EMPLOYEE_COLUMN)?;
        let location = grid.read_text(row, ASSIGNED_LOCATION_COLUMN)?;
        if !employee.is_empty() && !location.trim().is_empty() {
            result.insert(employee, location.trim().to_string());
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employees::{Employee, EmployeeList};
    use crate::grid::MemoryGrid;
    use crate::log_store::MemoryLogStore;
    use crate::notes::MemoryNoteStore;
    use crate::slot_text::Item;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 5, d).unwrap()
    }

    fn entry(d: u32, location: &str, shift: &str, names: &[&str]) -> Entry {
        let slot = Slot::lookup(date(d), location, shift).unwrap();
        Entry::new(slot, names.iter().map(|n| Item::named(*n)).collect())
    }

    fn employees() -> EmployeeList {
        EmployeeList::new(
            ["Alice", "Bob", "Carol"]
                .iter()
                .map(|h| Employee { handle: h.to_string(), alias: None })
                .collect(),
        )
    }

    fn sheet_with(entries: &[Entry], notes: &MemoryNoteStore) -> ScheduleSheet<MemoryGrid> {
        let mut log = MemoryLogStore::new();
        log.add(entries).unwrap();
        let range = DateRange::new(date(1), date(3)).unwrap();
        let layout = Layout::default();
        ScheduleSheet::setup(MemoryGrid::new(), layout, range, &log, notes, &employees()).unwrap()
    }

    #[test]
    fn test_setup_places_log_entries_and_scan_reads_them_back() {
        let entries = vec![
            entry(1, "Office", "Morning", &["Alice", "Bob"]),
            entry(2, "Ammergasse", "WholeDay", &["Carol"]),
            entry(3, "Xtras", "Afternoon", &["Bob"]),
        ];
        let sheet = sheet_with(&entries, &MemoryNoteStore::new());

        let mut expected = entries.clone();
        expected.sort_by(|a, b| compare_slots(&a.slot, &b.slot));
        assert_eq!(sheet.scan().unwrap(), expected);

        assert_eq!(sheet.grid().read_text(4, 10).unwrap(), "Alice, Bob");
        assert_eq!(sheet.grid().read_date(3, 5).unwrap(), date(1));
        assert_eq!(sheet.grid().read_text(1, 10).unwrap(), "Office");
        // Alice works one morning shift
        assert_eq!(sheet.grid().read_text(3, 1).unwrap(), "Alice");
        assert_eq!(sheet.grid().read_cell(3, 2).expect_number(3, 2).unwrap(), 4.25);
    }

    #[test]
    fn test_setup_rejects_layout_over_the_header() {
        let range = DateRange::new(date(1), date(3)).unwrap();
        let log = MemoryLogStore::new();
        for first_entry_row in [0, 1, 2] {
            let layout = Layout { first_entry_row, ..Layout::default() };
            let result = ScheduleSheet::setup(
                MemoryGrid::new(),
                layout,
                range,
                &log,
                &MemoryNoteStore::new(),
                &employees(),
            );
            assert!(matches!(result, Err(RosterError::Config(_))));
        }
    }

    #[test]
    fn test_setup_skips_entries_outside_range() {
        let outside = entry(9, "Office", "Morning", &["Alice"]);
        let sheet = sheet_with(&[outside], &MemoryNoteStore::new());
        assert!(sheet.scan().unwrap().is_empty());
    }

    #[test]
    fn test_open_reads_range_from_header() {
        let sheet = sheet_with(&[], &MemoryNoteStore::new());
        let reopened = ScheduleSheet::open(sheet.into_grid(), Layout::default()).unwrap();
        assert_eq!(reopened.range(), DateRange::new(date(1), date(3)).unwrap());

        let bad = MemoryGrid::from_text_rows(&[&["Von", "gestern", "bis", "morgen"]]);
        assert!(matches!(
            ScheduleSheet::open(bad, Layout::default()),
            Err(RosterError::ValueConversion { row: 1, column: 2, .. })
        ));
    }

    #[test]
    fn test_scan_fails_on_malformed_cell() {
        let mut sheet = sheet_with(&[], &MemoryNoteStore::new());
        let slot = Slot::lookup(date(1), "Office", "Morning").unwrap();
        sheet.write_slot(&slot, "Alice 19:00-09:00");
        assert!(matches!(sheet.scan(), Err(RosterError::SlotText { .. })));
    }

    #[test]
    fn test_notes_round_trip_through_sheet() {
        let mut notes = MemoryNoteStore::new();
        notes.add_or_replace(Note { date: date(2), index: 1, text: "delivery".into() }).unwrap();
        let mut sheet = sheet_with(&[], &notes);

        let column = sheet.mapper().note_column();
        assert_eq!(sheet.grid().read_text(6, column).unwrap(), "delivery");

        sheet.grid.write_cell(3, column, CellValue::text("inventory"));
        sheet.save_notes(&mut notes).unwrap();
        let texts: Vec<_> = notes
            .notes_in(&sheet.range())
            .unwrap()
            .into_iter()
            .map(|n| (n.date, n.index, n.text))
            .collect();
        assert_eq!(
            texts,
            vec![(date(1), 0, "inventory".to_string()), (date(2), 1, "delivery".to_string())]
        );
    }

    #[test]
    fn test_assignments_survive_setup() {
        let mut sheet = sheet_with(&[], &MemoryNoteStore::new());
        // Bob is on the second row of the pane.
        sheet.grid.write_cell(4, ASSIGNED_LOCATION_COLUMN, CellValue::text("Office"));

        let assigned = sheet.employees_and_locations(&employees()).unwrap();
        assert_eq!(assigned.get("Bob").map(|l| l.name), Some("Office"));
        assert_eq!(assigned.len(), 1);

        let range = sheet.range();
        let rebuilt = ScheduleSheet::setup(
            sheet.into_grid(),
            Layout::default(),
            range,
            &MemoryLogStore::new(),
            &MemoryNoteStore::new(),
            &employees(),
        )
        .unwrap();
        assert!(rebuilt.employees_and_locations(&employees()).unwrap().contains_key("Bob"));
    }

    #[test]
    fn test_assign_exclusive_moves_names_within_the_day() {
        let mut sheet = sheet_with(
            &[
                entry(1, "Office", "Morning", &["Alice", "Bob"]),
                entry(1, "Xtras", "WholeDay", &["Bob", "Carol"]),
                entry(2, "Office", "Morning", &["Bob"]),
            ],
            &MemoryNoteStore::new(),
        );

        let target = Slot::lookup(date(1), "Marktgasse", "Afternoon").unwrap();
        let changed = sheet.assign_exclusive(&target, &["Bob"]).unwrap();
        assert_eq!(changed.len(), 3);

        let scanned = sheet.scan().unwrap();
        assert_eq!(
            scanned,
            vec![
                entry(1, "Marktgasse", "Afternoon", &["Bob"]),
                entry(1, "Office", "Morning", &["Alice"]),
                entry(1, "Xtras", "WholeDay", &["Carol"]),
                entry(2, "Office", "Morning", &["Bob"]),
            ]
        );
    }
}
