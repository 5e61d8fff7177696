//! Row data model

mod json;
mod row;

pub use json::*;
pub use row::*;
