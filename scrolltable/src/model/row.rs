//! Table row

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Wire name of the identity field carried by every row.
pub const ID_FIELD: &str = "__id__";

/// Stable identity of a row, assigned by the row source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One record of table data.
///
/// Rows hold their column values as a `HashMap<String, Value>` next to the
/// identity token. On the wire the identity is the `__id__` key of the row
/// object; every other key is a column.
///
/// # Example
///
/// ```
/// use scrolltable::model::Row;
///
/// let row = Row::new("msg-1")
///     .set("subject", "Hello")
///     .set("read", false);
///
/// assert_eq!(row.id().as_str(), "msg-1");
/// assert_eq!(row.get_str("subject"), Some("Hello"));
/// assert_eq!(row.get_bool("read"), Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "__id__")]
    id: RowId,

    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a row with no columns.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Returns the row identity.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    // =========================================================================
    // Field access
    // =========================================================================

    /// Returns a reference to the column value, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Returns the column as a string, if present and a string.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(Value::as_str)
    }

    /// Returns the column as a bool, if present and a bool.
    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.fields.get(column).and_then(Value::as_bool)
    }

    /// Returns the column as an integer, if present and integral.
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.fields.get(column).and_then(Value::as_i64)
    }

    /// Returns `true` if the row has the given column.
    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Returns a reference to all columns.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the column names in sorted order.
    pub fn columns(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a column value (builder style).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Sets a column value in place, returning the previous value.
    ///
    /// This is how local flags such as `read` are flipped after a row has
    /// been registered.
    pub fn set_field(
        &mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.fields.insert(column.into(), value.into())
    }

    /// Removes a column, returning its value.
    pub fn remove_field(&mut self, column: &str) -> Option<Value> {
        self.fields.remove(column)
    }
}
