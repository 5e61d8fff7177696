//! Scroll table error type

use super::ModelError;
use super::SourceError;

/// Errors surfaced by [`ScrollTable`](crate::view::ScrollTable) operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TableError {
    /// A model invariant was violated.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The row source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl TableError {
    /// Returns the source error, if this is one.
    pub fn as_source(&self) -> Option<&SourceError> {
        match self {
            Self::Source(err) => Some(err),
            Self::Model(_) => None,
        }
    }
}
