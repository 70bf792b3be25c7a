//! The assignment log: one line per employee per slot, kept in slot order.

use std::cmp::Ordering;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::RosterResult;
use crate::fs;
use crate::shift::inferred_break_minutes;
use crate::slot::{Entry, Slot, compare_slots};
use crate::slot_text::Item;
use crate::time::{TimeOfDay, TimeRange};

/// One flattened row of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub date: NaiveDate,
    pub employee: String,
    pub location: String,
    pub shift: String,
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
    pub break_minutes: u16,
    /// Paid minutes for this line: `stop - start - break_minutes`.
    pub work_minutes: u16,
    /// Hours written explicitly in the cell, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_override: Option<TimeRange>,
}

impl LogLine {
    fn from_item(slot: &Slot, item: &Item) -> Self {
        let shift = slot.shift;
        let range = item.range().unwrap_or_else(|| shift.time_range());
        let break_minutes = match item.range() {
            Some(range) => inferred_break_minutes(range),
            None => shift.break_minutes,
        };
        LogLine {
            date: slot.date,
            employee: item.name().to_string(),
            location: slot.location.name.to_string(),
            shift: shift.name.to_string(),
            start: range.start,
            stop: range.stop,
            break_minutes,
            work_minutes: range.duration_minutes().saturating_sub(break_minutes),
            time_override: item.range(),
        }
    }

    pub fn slot(&self) -> RosterResult<Slot> {
        Slot::lookup(self.date, &self.location, &self.shift)
    }

    pub fn item(&self) -> Item {
        match self.time_override {
            Some(range) => Item::Specified { name: self.employee.clone(), range },
            None => Item::named(self.employee.clone()),
        }
    }

    fn matches(&self, date: NaiveDate, location: &str, shift: &str) -> bool {
        self.date == date && self.location == location && self.shift == shift
    }
}

/// Flatten entries into lines.
pub fn entries_to_lines(entries: &[Entry]) -> Vec<LogLine> {
    entries
        .iter()
        .flat_map(|e| e.employees.iter().map(move |item| LogLine::from_item(&e.slot, item)))
        .collect()
}

/// Slot order first, employee second. Lines with names outside the catalogs
/// fall back to comparing the raw names.
fn compare_lines(a: &LogLine, b: &LogLine) -> Ordering {
    let by_slot = match (a.slot(), b.slot()) {
        (Ok(sa), Ok(sb)) => compare_slots(&sa, &sb),
        _ => (a.date, &a.location, &a.shift).cmp(&(b.date, &b.location, &b.shift)),
    };
    by_slot.then_with(|| a.employee.cmp(&b.employee))
}

/// Durable store of all assignments.
pub trait LogStore {
    /// All lines, in slot order.
    fn lines(&self) -> RosterResult<Vec<LogLine>>;

    /// Add entries. The store stays sorted.
    fn add(&mut self, entries: &[Entry]) -> RosterResult<()>;

    /// Remove every line of one slot.
    fn remove_matching(&mut self, date: NaiveDate, location: &str, shift: &str) -> RosterResult<()>;

    /// Replace all lines dated within `from..=until` by `entries`.
    fn replace_range(
        &mut self,
        from: NaiveDate,
        until: NaiveDate,
        entries: &[Entry],
    ) -> RosterResult<()>;

    fn for_each(&self, f: &mut dyn FnMut(&LogLine)) -> RosterResult<()> {
        for line in self.lines()? {
            f(&line);
        }
        Ok(())
    }

    /// Call `f` once per slot with all its lines grouped into an entry.
    fn for_each_grouped(&self, f: &mut dyn FnMut(Entry)) -> RosterResult<()> {
        let mut current: Option<Entry> = None;
        for line in self.lines()? {
            let slot = line.slot()?;
            if let Some(entry) = current.as_mut() {
                if entry.slot == slot {
                    entry.employees.push(line.item());
                    continue;
                }
            }
            let next = Entry { slot, employees: vec![line.item()] };
            if let Some(done) = current.replace(next) {
                f(Entry::new(done.slot, done.employees));
            }
        }
        if let Some(done) = current {
            f(Entry::new(done.slot, done.employees));
        }
        Ok(())
    }

    /// Grouped entries dated within `range`, in slot order.
    fn entries_in(&self, range: &DateRange) -> RosterResult<Vec<Entry>> {
        let mut entries = Vec::new();
        self.for_each_grouped(&mut |entry| {
            if range.contains(entry.slot.date) {
                entries.push(entry);
            }
        })?;
        Ok(entries)
    }
}

/// Log held in memory and persisted as a JSON array of lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryLogStore {
    lines: Vec<LogLine>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> RosterResult<Self> {
        let mut store: MemoryLogStore = fs::load_json_or_default(path)?;
        store.sort();
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> RosterResult<()> {
        fs::save_json(path, self)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn sort(&mut self) {
        self.lines.sort_by(compare_lines);
    }
}

impl LogStore for MemoryLogStore {
    fn lines(&self) -> RosterResult<Vec<LogLine>> {
        Ok(self.lines.clone())
    }

    fn add(&mut self, entries: &[Entry]) -> RosterResult<()> {
        let new_lines = entries_to_lines(entries);
        if new_lines.is_empty() {
            return Ok(());
        }
        self.lines.extend(new_lines);
        self.sort();
        Ok(())
    }

    fn remove_matching(
        &mut self,
        date: NaiveDate,
        location: &str,
        shift: &str,
    ) -> RosterResult<()> {
        // Sorted, so all matching lines are one contiguous block.
        let Some(first) = self.lines.iter().position(|l| l.matches(date, location, shift)) else {
            return Ok(());
        };
        let count = self.lines[first..]
            .iter()
            .take_while(|l| l.matches(date, location, shift))
            .count();
        self.lines.drain(first..first + count);
        Ok(())
    }

    fn replace_range(
        &mut self,
        from: NaiveDate,
        until: NaiveDate,
        entries: &[Entry],
    ) -> RosterResult<()> {
        self.lines.retain(|l| l.date < from || l.date > until);
        self.lines.extend(entries_to_lines(entries));
        self.sort();
        Ok(())
    }
}

/// Paid minutes per employee for lines dated within `range`, sorted by employee.
pub fn work_minutes_by_employee(
    store: &dyn LogStore,
    range: &DateRange,
) -> RosterResult<Vec<(String, u32)>> {
    let mut totals: std::collections::BTreeMap<String, u32> = std::collections::BTreeMap::new();
    store.for_each(&mut |line| {
        if range.contains(line.date) {
            *totals.entry(line.employee.clone()).or_default() += u32::from(line.work_minutes);
        }
    })?;
    Ok(totals.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 5, d).unwrap()
    }

    fn entry(d: u32, location: &str, shift: &str, names: &[&str]) -> Entry {
        let slot = Slot::lookup(date(d), location, shift).unwrap();
        Entry::new(slot, names.iter().map(|n| Item::named(*n)).collect())
    }

    fn grouped(store: &MemoryLogStore) -> Vec<Entry> {
        let mut entries = Vec::new();
        store.for_each_grouped(&mut |e| entries.push(e)).unwrap();
        entries
    }

    #[test]
    fn test_add_keeps_slot_order_and_groups() {
        let mut store = MemoryLogStore::new();
        store.add(&[entry(2, "Office", "Morning", &["Bob"])]).unwrap();
        store.add(&[entry(1, "Office", "WholeDay", &["Carol", "Alice"])]).unwrap();
        store.add(&[entry(1, "Office", "Afternoon", &["Dan"])]).unwrap();

        let entries = grouped(&store);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], entry(1, "Office", "Afternoon", &["Dan"]));
        assert_eq!(entries[1], entry(1, "Office", "WholeDay", &["Alice", "Carol"]));
        assert_eq!(entries[2], entry(2, "Office", "Morning", &["Bob"]));
    }

    #[test]
    fn test_remove_matching_removes_only_that_slot() {
        let mut store = MemoryLogStore::new();
        store
            .add(&[
                entry(1, "Office", "Morning", &["Alice", "Bob"]),
                entry(1, "Office", "Afternoon", &["Carol"]),
                entry(1, "Xtras", "Morning", &["Dan"]),
            ])
            .unwrap();

        store.remove_matching(date(1), "Office", "Morning").unwrap();
        assert_eq!(store.len(), 2);
        store.remove_matching(date(3), "Office", "Morning").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_range_keeps_lines_outside() {
        let mut store = MemoryLogStore::new();
        store
            .add(&[
                entry(1, "Office", "Morning", &["Alice"]),
                entry(2, "Office", "Morning", &["Bob"]),
                entry(5, "Office", "Morning", &["Carol"]),
            ])
            .unwrap();

        store
            .replace_range(date(2), date(4), &[entry(3, "Xtras", "WholeDay", &["Dan"])])
            .unwrap();
        let entries = grouped(&store);
        let dates: Vec<_> = entries.iter().map(|e| e.slot.date).collect();
        assert_eq!(dates, vec![date(1), date(3), date(5)]);
    }

    #[test]
    fn test_override_round_trips_and_counts_for_hours() {
        let slot = Slot::lookup(date(1), "Office", "Afternoon").unwrap();
        let range: TimeRange = "13:00-17:00".parse().unwrap();
        let mut store = MemoryLogStore::new();
        store
            .add(&[Entry::new(
                slot,
                vec![Item::Specified { name: "Bob".into(), range }, Item::named("Alice")],
            )])
            .unwrap();

        let entries = grouped(&store);
        assert_eq!(entries[0].employees[1], Item::Specified { name: "Bob".into(), range });

        let whole = DateRange::new(date(1), date(31)).unwrap();
        let hours = work_minutes_by_employee(&store, &whole).unwrap();
        assert_eq!(hours, vec![("Alice".to_string(), 360), ("Bob".to_string(), 240)]);
    }

    #[test]
    fn test_long_override_pays_the_inferred_break() {
        let slot = Slot::lookup(date(1), "Office", "WholeDay").unwrap();
        let range: TimeRange = "9-19".parse().unwrap();
        let mut store = MemoryLogStore::new();
        let bob = Item::Specified { name: "Bob".into(), range };
        store.add(&[Entry::new(slot, vec![bob])]).unwrap();

        let line = &store.lines().unwrap()[0];
        assert_eq!(line.break_minutes, 60);
        assert_eq!(line.work_minutes, 540);
    }

    #[test]
    fn test_entries_in_range() {
        let mut store = MemoryLogStore::new();
        store
            .add(&[
                entry(1, "Office", "Morning", &["Alice"]),
                entry(9, "Office", "Morning", &["Bob"]),
            ])
            .unwrap();
        let range = DateRange::new(date(1), date(5)).unwrap();
        assert_eq!(store.entries_in(&range).unwrap().len(), 1);
    }

    #[test]
    fn test_json_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        let mut store = MemoryLogStore::new();
        store.add(&[entry(1, "Office", "Morning", &["Alice", "Bob"])]).unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryLogStore::load(&path).unwrap();
        assert_eq!(loaded.lines().unwrap(), store.lines().unwrap());
    }
}
