use std::fmt;

use crate::reconcile::DiffKind;
use crate::slot::{Entry, Slot};
use crate::slot_text::{self, Item};

/// Disagreement between the grid and the log about one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDiff {
    pub slot: Slot,
    pub employees_in_log: Vec<Item>,
    pub employees_in_grid: Vec<Item>,
}

impl fmt::Display for SlotDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: [{}] -> [{}]",
            self.kind(),
            self.slot,
            slot_text::format(&self.employees_in_log),
            slot_text::format(&self.employees_in_grid)
        )
    }
}

impl SlotDiff {
    /// Diff for one slot from its log and grid side, None when both agree.
    pub fn get_diff(in_log: Option<&Entry>, in_grid: Option<&Entry>) -> Option<SlotDiff> {
        let slot = in_grid.or(in_log)?.slot;
        let employees_in_log = in_log.map(|e| e.employees.clone()).unwrap_or_default();
        let employees_in_grid = in_grid.map(|e| e.employees.clone()).unwrap_or_default();
        if employees_in_log == employees_in_grid {
            return None;
        }
        Some(SlotDiff { slot, employees_in_log, employees_in_grid })
    }

    pub fn kind(&self) -> DiffKind {
        match (self.employees_in_log.is_empty(), self.employees_in_grid.is_empty()) {
            (true, _) => DiffKind::Added,
            (false, true) => DiffKind::Removed,
            (false, false) => DiffKind::Changed,
        }
    }

    /// The entry the log should hold for this slot after the diff is applied.
    pub fn grid_entry(&self) -> Entry {
        Entry { slot: self.slot, employees: self.employees_in_grid.clone() }
    }
}
