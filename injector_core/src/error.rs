use thiserror::Error;

use crate::row::RowId;

/// Defined failures at the row-store and validator boundary.
///
/// Degenerate numerics (too few rows, zero variance, zero slope) are never
/// errors; they surface as NaN metrics instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown row id {0}")]
    UnknownRow(RowId),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("row {0} is incomplete")]
    IncompleteRow(RowId),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
