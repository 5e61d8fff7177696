//! Row rendering strategy

use std::collections::HashSet;

use crate::model::Row;
use crate::model::RowId;

/// Turns fetched rows into the content handle stored on a materialized
/// range.
///
/// The table never inspects a `Node`; it only hands it back to the
/// renderer when a row inside it is deleted.
pub trait RowRenderer: Send {
    /// Handle for a block of rendered rows.
    type Node: Clone + Send;

    /// Renders `rows`, which start at table index `offset`.
    fn render_rows(&mut self, offset: usize, rows: &[Row]) -> Self::Node;

    /// Drops the row at `position` (relative to the block start) from a
    /// rendered block.
    fn row_removed(&mut self, node: &mut Self::Node, position: usize);

    /// Returns `true` if the column should not be shown.
    fn skip_column(&self, _column: &str) -> bool {
        false
    }

    /// Returns the shown columns of `row`, in name order.
    fn visible_columns<'r>(&self, row: &'r Row) -> Vec<&'r str> {
        row.columns()
            .into_iter()
            .filter(|column| !self.skip_column(column))
            .collect()
    }
}

/// A rendered block: the ids and shown cells of its rows, in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowBlock {
    /// Row ids.
    pub ids: Vec<RowId>,
    /// Per row, `(column, value)` pairs for the shown columns.
    pub cells: Vec<Vec<(String, String)>>,
}

impl RowBlock {
    /// Number of rows in the block.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the block holds no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The default renderer: collects ids and stringified cell values.
#[derive(Debug, Clone, Default)]
pub struct BlockRenderer {
    hidden: HashSet<String>,
}

impl BlockRenderer {
    /// Creates a renderer that shows every column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides a column.
    pub fn hide_column(mut self, column: impl Into<String>) -> Self {
        self.hidden.insert(column.into());
        self
    }
}

impl RowRenderer for BlockRenderer {
    type Node = RowBlock;

    fn render_rows(&mut self, _offset: usize, rows: &[Row]) -> RowBlock {
        let mut block = RowBlock::default();
        for row in rows {
            block.ids.push(row.id().clone());
            let cells = self
                .visible_columns(row)
                .into_iter()
                .map(|column| {
                    let value = match row.get(column) {
                        Some(serde_json::Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => String::new(),
                    };
                    (column.to_string(), value)
                })
                .collect();
            block.cells.push(cells);
        }
        block
    }

    fn row_removed(&mut self, node: &mut RowBlock, position: usize) {
        if position < node.ids.len() {
            node.ids.remove(position);
            node.cells.remove(position);
        }
    }

    fn skip_column(&self, column: &str) -> bool {
        self.hidden.contains(column)
    }
}
