//! Model invariant errors

use crate::model::RowId;

/// Misuse of the row or placeholder models.
///
/// These are programmer errors: the caller asked for something the current
/// model state cannot satisfy. The model is left unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// `deactivate_row` was called while no row was active.
    #[error("No active row")]
    NoActiveRow,

    /// The row id is not registered with the model.
    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    /// A range with `start >= stop` was requested.
    #[error("Invalid range [{start}, {stop})")]
    InvalidRange {
        /// First row index of the range.
        start: usize,
        /// One past the last row index of the range.
        stop: usize,
    },

    /// A placeholder sequence position past the end of the sequence.
    #[error("Placeholder index {index} out of bounds (count {count})")]
    PlaceholderIndexOutOfBounds {
        /// The requested position.
        index: usize,
        /// Number of placeholders in the model.
        count: usize,
    },

    /// The new range would overlap a neighbour or break the ordering.
    #[error("Placeholder [{start}, {stop}) overlaps its neighbours")]
    OverlappingPlaceholder {
        /// First row index of the offending range.
        start: usize,
        /// One past the last row index of the offending range.
        stop: usize,
    },
}

impl ModelError {
    /// Creates an unknown-row error.
    pub fn unknown_row(id: &RowId) -> Self {
        Self::UnknownRow(id.clone())
    }
}
