//! Virtualized scroll table models
//!
//! Client-side bookkeeping for tables whose rows are fetched lazily, in
//! contiguous ranges, from a server:
//!
//! - [`selection::RowSelectionModel`] owns the loaded rows, the selection and
//!   the active row, and notifies observers of changes.
//! - [`placeholder::PlaceholderModel`] tracks which index ranges are still
//!   unfetched placeholders and which are materialized.
//! - [`view::ScrollTable`] drives both from a scroll position and a
//!   [`source::RowSource`].

pub mod error;
pub mod model;
pub mod placeholder;
pub mod selection;
pub mod source;
pub mod view;

pub use error::ModelError;
pub use error::SourceError;
pub use error::TableError;
pub use model::Row;
pub use model::RowId;
