//! Routing of single cell edit notifications.
//!
//! An edit to one slot cell is written straight into the log without a
//! rescan. Bulk edits, which carry no before/after values, fall back to a
//! full sync.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::RosterResult;
use crate::grid::GridStore;
use crate::log_store::LogStore;
use crate::notes::{Note, NoteStore};
use crate::reconcile::{self, SyncReport};
use crate::schedule::ScheduleSheet;
use crate::slot::{Entry, Slot};
use crate::slot_text;

/// One edit notification from the host. Both values are None for bulk edits
/// such as a paste, a sort or an undo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditEvent {
    pub row: u32,
    pub column: u32,
    pub old_value: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Change,
    Clear,
    MassChange,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl EditEvent {
    pub fn kind(&self) -> EditKind {
        if self.old_value.is_none() && self.value.is_none() {
            return EditKind::MassChange;
        }
        match (non_empty(&self.old_value), non_empty(&self.value)) {
            (None, Some(_)) => EditKind::Insert,
            (Some(_), Some(_)) => EditKind::Change,
            (_, None) => EditKind::Clear,
        }
    }

    fn new_text(&self) -> &str {
        non_empty(&self.value).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// Another edit was still being handled.
    Skipped,
    Synced(SyncReport),
    SlotUpdated(Entry),
    NoteUpdated { date: chrono::NaiveDate, index: u32 },
    /// Outside the entry region and the notes column.
    Inert,
    /// The single cell path failed and left the log untouched.
    Failed(String),
}

/// Handles edits one at a time. An edit arriving while another is handled,
/// e.g. raised by a write the first one made, is dropped.
#[derive(Debug, Default)]
pub struct EditDispatcher {
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EditDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn enter(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    /// Handle one edit. Only a failing full sync is returned as an error.
    pub fn handle<G: GridStore>(
        &self,
        event: &EditEvent,
        sheet: &ScheduleSheet<G>,
        log: &mut dyn LogStore,
        notes: &mut dyn NoteStore,
    ) -> RosterResult<EditOutcome> {
        let Some(_guard) = self.enter() else {
            tracing::warn!(
                row = event.row,
                column = event.column,
                "edit arrived while another is handled, skipping"
            );
            return Ok(EditOutcome::Skipped);
        };

        let kind = event.kind();
        tracing::debug!(row = event.row, column = event.column, ?kind, "handling edit");
        if kind == EditKind::MassChange {
            let report = reconcile::sync(sheet, log)?;
            sheet.save_notes(notes)?;
            return Ok(EditOutcome::Synced(report));
        }

        let mapper = sheet.mapper();
        let result = if let Some(slot) = mapper.cell_to_slot(event.row, event.column) {
            update_slot(&slot, event.new_text(), log).map(EditOutcome::SlotUpdated)
        } else if event.column == mapper.note_column() {
            match mapper.note_at(event.row) {
                Some((date, index)) => update_note(date, index, kind, event.new_text(), notes)
                    .map(|_| EditOutcome::NoteUpdated { date, index }),
                None => Ok(EditOutcome::Inert),
            }
        } else {
            Ok(EditOutcome::Inert)
        };

        Ok(result.unwrap_or_else(|e| {
            tracing::warn!(
                row = event.row,
                column = event.column,
                error = %e,
                "single cell edit failed"
            );
            EditOutcome::Failed(e.to_string())
        }))
    }
}

/// Replace one slot's lines in the log with the parsed cell text.
fn update_slot(slot: &Slot, text: &str, log: &mut dyn LogStore) -> RosterResult<Entry> {
    let entry = Entry::new(*slot, slot_text::parse(text)?);
    log.remove_matching(slot.date, slot.location.name, slot.shift.name)?;
    if !entry.is_empty() {
        log.add(std::slice::from_ref(&entry))?;
    }
    Ok(entry)
}

fn update_note(
    date: chrono::NaiveDate,
    index: u32,
    kind: EditKind,
    text: &str,
    notes: &mut dyn NoteStore,
) -> RosterResult<()> {
    match kind {
        EditKind::Clear => notes.delete_matching(date, index),
        _ => notes.add_or_replace(Note { date, index, text: text.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::date_range::DateRange;
    use crate::employees::EmployeeList;
    use crate::grid::MemoryGrid;
    use crate::log_store::LogLine;
    use crate::log_store::MemoryLogStore;
    use crate::notes::MemoryNoteStore;
    use crate::slot_text::Item;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 5, d).unwrap()
    }

    fn event(row: u32, column: u32, old: Option<&str>, new: Option<&str>) -> EditEvent {
        EditEvent { row, column, old_value: old.map(String::from), value: new.map(String::from) }
    }

    fn sheet() -> ScheduleSheet<MemoryGrid> {
        let range = DateRange::new(date(1), date(3)).unwrap();
        ScheduleSheet::setup(
            MemoryGrid::new(),
            Layout::default(),
            range,
            &MemoryLogStore::new(),
            &MemoryNoteStore::new(),
            &EmployeeList::default(),
        )
        .unwrap()
    }

    fn office_morning(d: u32) -> Slot {
        Slot::lookup(date(d), "Office", "Morning").unwrap()
    }

    #[test]
    fn test_classify() {
        assert_eq!(event(1, 1, None, None).kind(), EditKind::MassChange);
        assert_eq!(event(1, 1, None, Some("A")).kind(), EditKind::Insert);
        assert_eq!(event(1, 1, Some("A"), Some("B")).kind(), EditKind::Change);
        assert_eq!(event(1, 1, Some("A"), None).kind(), EditKind::Clear);
        assert_eq!(event(1, 1, Some("A"), Some("")).kind(), EditKind::Clear);
        assert_eq!(event(1, 1, Some(""), Some("B")).kind(), EditKind::Insert);
    }

    #[test]
    fn test_slot_edits_go_straight_to_the_log() {
        let sheet = sheet();
        let mut log = MemoryLogStore::new();
        let mut notes = MemoryNoteStore::new();
        let dispatcher = EditDispatcher::new();
        // Office Morning on the first date
        let (row, column) = (4, 10);

        let outcome = dispatcher
            .handle(&event(row, column, None, Some("B, A 10-14")), &sheet, &mut log, &mut notes)
            .unwrap();
        assert!(matches!(outcome, EditOutcome::SlotUpdated(ref e) if e.slot == office_morning(1)));
        let entries = log.entries_in(&sheet.range()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].employee_names(), vec!["A", "B"]);
        assert!(matches!(entries[0].employees[0], Item::Specified { .. }));

        let change = event(row, column, Some("B, A 10-14"), Some("C"));
        dispatcher.handle(&change, &sheet, &mut log, &mut notes).unwrap();
        let names: Vec<String> =
            log.lines().unwrap().into_iter().map(|l: LogLine| l.employee).collect();
        assert_eq!(names, vec!["C"]);

        let clear = event(row, column, Some("C"), None);
        dispatcher.handle(&clear, &sheet, &mut log, &mut notes).unwrap();
        assert!(log.is_empty());
        assert!(!dispatcher.is_busy());
    }

    #[test]
    fn test_bad_slot_text_is_swallowed_and_log_kept() {
        let sheet = sheet();
        let mut log = MemoryLogStore::new();
        log.add(&[Entry::new(office_morning(1), vec![Item::named("A")])]).unwrap();
        let mut notes = MemoryNoteStore::new();
        let dispatcher = EditDispatcher::new();

        let outcome = dispatcher
            .handle(&event(4, 10, Some("A"), Some("A 18-9")), &sheet, &mut log, &mut notes)
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Failed(_)));
        assert_eq!(log.len(), 1);
        assert!(!dispatcher.is_busy());
    }

    #[test]
    fn test_note_edits() {
        let sheet = sheet();
        let mut log = MemoryLogStore::new();
        let mut notes = MemoryNoteStore::new();
        let dispatcher = EditDispatcher::new();
        let column = sheet.mapper().note_column();

        let insert = event(6, column, None, Some("keys"));
        let outcome = dispatcher.handle(&insert, &sheet, &mut log, &mut notes).unwrap();
        assert!(matches!(outcome, EditOutcome::NoteUpdated { index: 1, .. }));
        assert_eq!(notes.notes_in(&sheet.range()).unwrap()[0].date, date(2));

        let clear = event(6, column, Some("keys"), None);
        dispatcher.handle(&clear, &sheet, &mut log, &mut notes).unwrap();
        assert!(notes.notes_in(&sheet.range()).unwrap().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_edits_outside_entries_are_inert() {
        let sheet = sheet();
        let mut log = MemoryLogStore::new();
        let mut notes = MemoryNoteStore::new();
        let dispatcher = EditDispatcher::new();

        for (row, column) in [(1, 10), (4, 9), (2, 20), (3, 2)] {
            let insert = event(row, column, None, Some("A"));
            let outcome = dispatcher.handle(&insert, &sheet, &mut log, &mut notes).unwrap();
            assert!(matches!(outcome, EditOutcome::Inert), "({row}, {column})");
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_mass_change_syncs_whole_sheet() {
        let mut sheet = sheet();
        sheet.write_slot(&office_morning(2), "A, B");
        let mut log = MemoryLogStore::new();
        let mut notes = MemoryNoteStore::new();
        let dispatcher = EditDispatcher::new();

        let bulk = event(1, 1, None, None);
        let outcome = dispatcher.handle(&bulk, &sheet, &mut log, &mut notes).unwrap();
        match outcome {
            EditOutcome::Synced(report) => assert_eq!(report.counts(), (1, 0, 0)),
            other => panic!("Expected Synced, got {:?}", other),
        }
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_mass_change_surfaces_errors() {
        let mut sheet = sheet();
        sheet.write_slot(&office_morning(2), "A 25-26");
        let dispatcher = EditDispatcher::new();
        let result = dispatcher.handle(
            &event(1, 1, None, None),
            &sheet,
            &mut MemoryLogStore::new(),
            &mut MemoryNoteStore::new(),
        );
        assert!(result.is_err());
        assert!(!dispatcher.is_busy());
    }

    /// A log that raises another edit while it is being written to.
    struct EchoingLog<'a> {
        inner: MemoryLogStore,
        dispatcher: &'a EditDispatcher,
        sheet: &'a ScheduleSheet<MemoryGrid>,
        nested: Vec<EditOutcome>,
    }

    impl LogStore for EchoingLog<'_> {
        fn lines(&self) -> RosterResult<Vec<LogLine>> {
            self.inner.lines()
        }

        fn add(&mut self, entries: &[Entry]) -> RosterResult<()> {
            let echo = event(4, 10, None, Some("Z"));
            let outcome = self.dispatcher.handle(
                &echo,
                self.sheet,
                &mut MemoryLogStore::new(),
                &mut MemoryNoteStore::new(),
            )?;
            self.nested.push(outcome);
            self.inner.add(entries)
        }

        fn remove_matching(
            &mut self,
            date: NaiveDate,
            location: &str,
            shift: &str,
        ) -> RosterResult<()> {
            self.inner.remove_matching(date, location, shift)
        }

        fn replace_range(
            &mut self,
            from: NaiveDate,
            until: NaiveDate,
            entries: &[Entry],
        ) -> RosterResult<()> {
            self.inner.replace_range(from, until, entries)
        }
    }

    #[test]
    fn test_reentrant_edit_is_skipped() {
        let sheet = sheet();
        let dispatcher = EditDispatcher::new();
        let mut log = EchoingLog {
            inner: MemoryLogStore::new(),
            dispatcher: &dispatcher,
            sheet: &sheet,
            nested: vec![],
        };

        let outcome = dispatcher
            .handle(&event(4, 10, None, Some("A")), &sheet, &mut log, &mut MemoryNoteStore::new())
            .unwrap();
        assert!(matches!(outcome, EditOutcome::SlotUpdated(_)));
        assert_eq!(log.nested.len(), 1);
        assert!(matches!(log.nested[0], EditOutcome::Skipped));
        assert_eq!(log.inner.len(), 1);
        assert!(!dispatcher.is_busy());

        dispatcher.busy.store(true, Ordering::Release);
        let outcome = dispatcher
            .handle(&event(4, 10, None, Some("B")), &sheet, &mut log, &mut MemoryNoteStore::new())
            .unwrap();
        assert!(matches!(outcome, EditOutcome::Skipped));
        assert_eq!(log.inner.len(), 1);
    }
}
