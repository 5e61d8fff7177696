//! In-memory row source

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::RowSource;
use crate::error::SourceError;
use crate::model::Row;
use crate::model::RowId;
use crate::model::rows_from_json;

/// A row source backed by a vector held in memory.
///
/// Useful for tests and demos, and for tables whose data is already local.
/// Rows can be added and removed while a table is reading from it, which is
/// how a server-side change in row count is simulated.
///
/// # Example
///
/// ```
/// use scrolltable::model::Row;
/// use scrolltable::source::InMemoryRowSource;
///
/// let source = InMemoryRowSource::new(vec![Row::new("a"), Row::new("b")]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRowSource {
    rows: RwLock<Vec<Row>>,
}

impl InMemoryRowSource {
    /// Creates a source over the given rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Creates a source from a JSON array of row objects.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Decode`] if the value is not a valid row array.
    pub fn from_json(value: Value) -> Result<Self, SourceError> {
        Ok(Self::new(rows_from_json(value)?))
    }

    /// Appends a row.
    pub async fn push(&self, row: Row) {
        self.rows.write().await.push(row);
    }

    /// Removes the row with the given id, returning it.
    pub async fn remove(&self, id: &RowId) -> Option<Row> {
        let mut rows = self.rows.write().await;
        let position = rows.iter().position(|row| row.id() == id)?;
        Some(rows.remove(position))
    }

    /// Returns the number of rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if there are no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl RowSource for InMemoryRowSource {
    async fn request_row_range(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Row>, SourceError> {
        let rows = self.rows.read().await;
        let start = offset.min(rows.len());
        let end = offset.saturating_add(count).min(rows.len());
        Ok(rows[start..end].to_vec())
    }

    async fn request_current_size(&self) -> Result<usize, SourceError> {
        Ok(self.rows.read().await.len())
    }
}
