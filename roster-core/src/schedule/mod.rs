//! The schedule grid: where each slot lives and what the sheet around it holds.

pub mod mapper;
mod sheet;

pub use mapper::{CellPos, GridMapper};
pub use sheet::ScheduleSheet;
