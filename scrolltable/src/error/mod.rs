//! Error types

mod model;
mod source;
mod table;

pub use model::*;
pub use source::*;
pub use table::*;
