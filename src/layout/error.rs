use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("unknown division '{0}'")]
    UnknownDivision(String),
    #[error("division '{0}' already exists")]
    DuplicateDivision(String),
    #[error("invalid division '{id}': {reason}")]
    InvalidDivision { id: String, reason: String },
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("overlaps remain after {iterations} iterations ({remaining} pairs)")]
    NotConverged { iterations: usize, remaining: usize },
    #[error("no free grid cell for a new division")]
    NoFreeCell,
    #[error("no conflict-free position for '{id}' after {attempts} attempts")]
    NoSafePosition { id: String, attempts: usize },
}
