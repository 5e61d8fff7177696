//! Row source abstraction
//!
//! The scroll table never talks to a server directly. It asks a
//! [`RowSource`] for the current row count and for contiguous row ranges,
//! and whatever transport sits behind the trait is the application's
//! business.

mod memory;

pub use memory::*;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::Row;

/// Supplies rows for a virtualized table.
///
/// # Example
///
/// ```ignore
/// use scrolltable::source::{InMemoryRowSource, RowSource};
///
/// let source = InMemoryRowSource::new(rows);
/// let total = source.request_current_size().await?;
/// let first_page = source.request_row_range(0, 20).await?;
/// ```
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches up to `count` rows starting at `offset`.
    ///
    /// Fewer rows than requested are returned when the range runs past the
    /// end of the table.
    async fn request_row_range(&self, offset: usize, count: usize) -> Result<Vec<Row>, SourceError>;

    /// Fetches the current total row count.
    async fn request_current_size(&self) -> Result<usize, SourceError>;
}
