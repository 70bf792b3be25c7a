//! The fixed shift catalog and shift classification.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};
use crate::time::{MINUTES_PER_HOUR, TimeOfDay, TimeRange};

/// Hours written outside the catalog get a lunch break from this length on.
const BREAK_THRESHOLD_HOURS: u16 = 7;
const INFERRED_BREAK_MINUTES: u16 = 60;

/// Break for a stretch of work whose hours are not a catalog shift's.
pub fn inferred_break_minutes(range: TimeRange) -> u16 {
    if range.duration_minutes() >= BREAK_THRESHOLD_HOURS * MINUTES_PER_HOUR {
        INFERRED_BREAK_MINUTES
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    Morning,
    Afternoon,
    WholeDay,
}

impl ShiftKind {
    /// Classify an arbitrary start/stop pair by its hours.
    ///
    /// A shift starting after 12 and ending by 14 is classified as a whole day.
    /// That rule is odd but kept on purpose, see `classify_late_start_early_stop`.
    pub fn classify(start: TimeOfDay, stop: TimeOfDay) -> ShiftKind {
        let starts_early = start.hours() <= 12;
        let stops_early = stop.hours() <= 14;
        match (starts_early, stops_early) {
            (true, true) => ShiftKind::Morning,
            (true, false) => ShiftKind::WholeDay,
            (false, true) => {
                tracing::debug!(
                    start = %start,
                    stop = %stop,
                    "late start with early stop classified as whole day"
                );
                ShiftKind::WholeDay
            }
            (false, false) => ShiftKind::Afternoon,
        }
    }

    /// Grid offset (row, column) of this kind inside a date/location block.
    pub fn display_offset(self) -> (u32, u32) {
        match self {
            ShiftKind::WholeDay => (0, 0),
            ShiftKind::Morning => (1, 0),
            ShiftKind::Afternoon => (1, 1),
        }
    }

    /// Inverse of `display_offset`.
    pub fn from_display_offset(row: u32, column: u32) -> Option<ShiftKind> {
        match (row, column) {
            (0, 0) => Some(ShiftKind::WholeDay),
            (1, 0) => Some(ShiftKind::Morning),
            (1, 1) => Some(ShiftKind::Afternoon),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftKind::Morning => write!(f, "Morning"),
            ShiftKind::Afternoon => write!(f, "Afternoon"),
            ShiftKind::WholeDay => write!(f, "WholeDay"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Shift {
    pub name: &'static str,
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
    pub break_minutes: u16,
    pub kind: ShiftKind,
}

impl Shift {
    const fn new(
        name: &'static str,
        start: TimeOfDay,
        stop: TimeOfDay,
        break_minutes: u16,
        kind: ShiftKind,
    ) -> Self {
        Shift { name, start, stop, break_minutes, kind }
    }

    pub fn display_offset(&self) -> (u32, u32) {
        self.kind.display_offset()
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange { start: self.start, stop: self.stop }
    }

    /// Paid minutes: wall clock time minus the break.
    pub fn work_minutes(&self) -> u16 {
        self.time_range().duration_minutes().saturating_sub(self.break_minutes)
    }

    pub fn all() -> &'static [Shift] {
        &CATALOG
    }

    /// Catalog shifts ordered by name, the order slots compare in.
    pub fn by_name_order() -> &'static [&'static Shift] {
        &BY_NAME_ORDER
    }

    pub fn by_name(name: &str) -> Option<&'static Shift> {
        BY_NAME.get(name).copied()
    }

    pub fn require(name: &str) -> RosterResult<&'static Shift> {
        Shift::by_name(name).ok_or_else(|| RosterError::UnknownShift(name.to_string()))
    }

    pub fn by_kind(kind: ShiftKind) -> &'static Shift {
        match kind {
            ShiftKind::Morning => &CATALOG[1],
            ShiftKind::Afternoon => &CATALOG[2],
            ShiftKind::WholeDay => &CATALOG[0],
        }
    }

    /// Catalog shift with exactly these times, if any.
    pub fn by_times(
        start: TimeOfDay,
        stop: TimeOfDay,
        break_minutes: u16,
    ) -> Option<&'static Shift> {
        BY_TIMES.get(&(start, stop, break_minutes)).copied()
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.time_range())
    }
}

static CATALOG: [Shift; 3] = [
    Shift::new("WholeDay", TimeOfDay::hhmm(9, 45), TimeOfDay::hhmm(19, 0), 60, ShiftKind::WholeDay),
    Shift::new("Morning", TimeOfDay::hhmm(9, 45), TimeOfDay::hhmm(14, 0), 0, ShiftKind::Morning),
    Shift::new(
        "Afternoon",
        TimeOfDay::hhmm(13, 0),
        TimeOfDay::hhmm(19, 0),
        0,
        ShiftKind::Afternoon,
    ),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Shift>> =
    LazyLock::new(|| CATALOG.iter().map(|s| (s.name, s)).collect());

static BY_TIMES: LazyLock<HashMap<(TimeOfDay, TimeOfDay, u16), &'static Shift>> =
    LazyLock::new(|| CATALOG.iter().map(|s| ((s.start, s.stop, s.break_minutes), s)).collect());

static BY_NAME_ORDER: LazyLock<Vec<&'static Shift>> = LazyLock::new(|| {
    let mut shifts: Vec<_> = CATALOG.iter().collect();
    shifts.sort_by_key(|s| s.name);
    shifts
});
