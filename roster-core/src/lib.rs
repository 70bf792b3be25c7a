//! Core types for the roster ecosystem.
//!
//! This crate provides the scheduling model used by roster-cli:
//! - the fixed `shift` and `location` catalogs, `Slot` and `Entry`
//! - `slot_text` for the free text inside one schedule cell
//! - `schedule` for the grid layout and the sheet built on it
//! - `reconcile` for the diff and sync between the grid and the log
//! - `survey` for importing an availability survey
//! - `dispatch` for single cell edit notifications

pub mod config;
pub mod date_range;
pub mod dispatch;
pub mod employees;
pub mod error;
pub mod fs;
pub mod grid;
pub mod location;
pub mod log_store;
pub mod notes;
pub mod reconcile;
pub mod roster;
pub mod schedule;
pub mod shift;
pub mod slot;
pub mod slot_text;
pub mod survey;
pub mod time;

pub use error::{RosterError, RosterResult};
pub use location::Location;
pub use shift::{Shift, ShiftKind};
pub use slot::{Entry, Place, Slot};
