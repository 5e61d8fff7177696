//! JSON decoding of row source responses

use serde_json::Value;

use super::Row;
use crate::error::SourceError;

impl Row {
    /// Decodes a row from a JSON object carrying an `__id__` key.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Decode`] if the value is not an object or its
    /// `__id__` is missing or not a string.
    pub fn from_json(value: Value) -> Result<Self, SourceError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encodes the row back into a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::with_capacity(self.fields().len() + 1);
        object.insert(super::ID_FIELD.to_string(), Value::String(self.id().to_string()));
        for (column, value) in self.fields() {
            object.insert(column.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// Decodes a JSON array of row objects, as returned for a range request.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the value is not an array or any
/// element fails [`Row::from_json`].
pub fn rows_from_json(value: Value) -> Result<Vec<Row>, SourceError> {
    match value {
        Value::Array(items) => items.into_iter().map(Row::from_json).collect(),
        other => Err(SourceError::decode(format!(
            "expected an array of rows, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
