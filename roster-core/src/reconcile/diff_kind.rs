use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// On the grid, not in the log.
    Added,
    /// In both, with different employees.
    Changed,
    /// In the log, not on the grid.
    Removed,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Added => write!(f, "+"),
            DiffKind::Changed => write!(f, "~"),
            DiffKind::Removed => write!(f, "-"),
        }
    }
}
