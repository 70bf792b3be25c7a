//! Free text notes attached to a date. Each date has a small number of note rows.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::RosterResult;
use crate::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub date: NaiveDate,
    /// Row of the note within its date block.
    pub index: u32,
    pub text: String,
}

pub trait NoteStore {
    fn notes_in(&self, range: &DateRange) -> RosterResult<Vec<Note>>;

    /// Add a note or replace the one with the same date and index.
    fn add_or_replace(&mut self, note: Note) -> RosterResult<()>;

    fn delete_matching(&mut self, date: NaiveDate, index: u32) -> RosterResult<()>;

    /// Replace all notes within `from..=until`.
    fn replace_range(
        &mut self,
        from: NaiveDate,
        until: NaiveDate,
        notes: Vec<Note>,
    ) -> RosterResult<()>;
}

/// Notes held in memory, sorted by (date, index), persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryNoteStore {
    notes: Vec<Note>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> RosterResult<Self> {
        let mut store: MemoryNoteStore = fs::load_json_or_default(path)?;
        store.sort();
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> RosterResult<()> {
        fs::save_json(path, self)
    }

    fn sort(&mut self) {
        self.notes.sort_by_key(|n| (n.date, n.index));
    }
}

impl NoteStore for MemoryNoteStore {
    fn notes_in(&self, range: &DateRange) -> RosterResult<Vec<Note>> {
        Ok(self.notes.iter().filter(|n| range.contains(n.date)).cloned().collect())
    }

    fn add_or_replace(&mut self, note: Note) -> RosterResult<()> {
        match self.notes.iter_mut().find(|n| n.date == note.date && n.index == note.index) {
            Some(existing) => existing.text = note.text,
            None => {
                self.notes.push(note);
                self.sort();
            }
        }
        Ok(())
    }

    fn delete_matching(&mut self, date: NaiveDate, index: u32) -> RosterResult<()> {
        self.notes.retain(|n| !(n.date == date && n.index == index));
        Ok(())
    }

    fn replace_range(
        &mut self,
        from: NaiveDate,
        until: NaiveDate,
        notes: Vec<Note>,
    ) -> RosterResult<()> {
        self.notes.retain(|n| n.date < from || n.date > until);
        self.notes.extend(notes);
        self.sort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(d: u32, index: u32, text: &str) -> Note {
        Note { date: NaiveDate::from_ymd_opt(2019, 5, d).unwrap(), index, text: text.into() }
    }

    #[test]
    fn test_add_or_replace_and_delete() {
        let mut store = MemoryNoteStore::new();
        store.add_or_replace(note(2, 0, "inventory")).unwrap();
        store.add_or_replace(note(1, 1, "delivery")).unwrap();
        store.add_or_replace(note(2, 0, "inventory at 8")).unwrap();

        let range = DateRange::new(note(1, 0, "").date, note(31, 0, "").date).unwrap();
        let notes = store.notes_in(&range).unwrap();
        assert_eq!(notes, vec![note(1, 1, "delivery"), note(2, 0, "inventory at 8")]);

        store.delete_matching(note(1, 0, "").date, 1).unwrap();
        assert_eq!(store.notes_in(&range).unwrap().len(), 1);
    }

    #[test]
    fn test_replace_range() {
        let mut store = MemoryNoteStore::new();
        store.add_or_replace(note(1, 0, "a")).unwrap();
        store.add_or_replace(note(3, 0, "b")).unwrap();
        store
            .replace_range(note(2, 0, "").date, note(4, 0, "").date, vec![note(2, 1, "c")])
            .unwrap();

        let all = DateRange::new(note(1, 0, "").date, note(31, 0, "").date).unwrap();
        let texts: Vec<_> = store.notes_in(&all).unwrap().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }
}
