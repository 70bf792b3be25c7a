//! Slots and entries: the units of scheduling identity and storage.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::error::RosterResult;
use crate::location::Location;
use crate::shift::Shift;
use crate::slot_text::{self, Item};

/// A place is a date and a location, e.g. the Office on 2019-03-20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Place {
    pub date: NaiveDate,
    pub location: &'static Location,
}

/// A place plus a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub location: &'static Location,
    pub shift: &'static Shift,
}

impl Slot {
    pub fn new(date: NaiveDate, location: &'static Location, shift: &'static Shift) -> Self {
        Slot { date, location, shift }
    }

    /// Resolve location and shift by name.
    pub fn lookup(date: NaiveDate, location: &str, shift: &str) -> RosterResult<Self> {
        Ok(Slot {
            date,
            location: Location::require(location)?,
            shift: Shift::require(shift)?,
        })
    }

    pub fn place(&self) -> Place {
        Place { date: self.date, location: self.location }
    }
}

/// The one ordering of slots. The grid scan, the log store and the diff all
/// rely on it: date, then location name, then shift name.
pub fn compare_slots(a: &Slot, b: &Slot) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.location.name.cmp(b.location.name))
        .then_with(|| a.shift.name.cmp(b.shift.name))
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_slots(self, other)
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.location.name, self.shift.name)
    }
}

/// All employees working one slot. Employees are kept sorted by name without repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub slot: Slot,
    pub employees: Vec<Item>,
}

impl Entry {
    pub fn new(slot: Slot, employees: Vec<Item>) -> Self {
        Entry { slot, employees: slot_text::normalize(employees) }
    }

    pub fn employee_names(&self) -> Vec<&str> {
        self.employees.iter().map(Item::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Text for the slot's grid cell.
    pub fn cell_text(&self) -> String {
        slot_text::format(&self.employees)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.slot, self.cell_text())
    }
}
