//! Error types for the roster ecosystem.

use thiserror::Error;

/// Errors that can occur in roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Expected {expected} at row {row}, column {column}, got {got}")]
    ValueConversion {
        expected: &'static str,
        got: String,
        row: u32,
        column: u32,
    },

    #[error("Cannot parse time range in '{token}' (slot text: '{text}')")]
    SlotText { text: String, token: String },

    #[error("Invalid time range: '{0}'")]
    TimeRange(String),

    #[error("Cannot parse {header} header in column {column}: '{text}'")]
    SurveyHeader {
        header: &'static str,
        column: u32,
        text: String,
    },

    #[error("No shift matches survey time {start} - {stop}")]
    UnresolvableShift { start: String, stop: String },

    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Unknown shift: {0}")]
    UnknownShift(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;
