//! View-facing glue for virtualized scroll tables.
//!
//! [`ScrollTable`] turns a scroll position into row fetches: it asks the
//! placeholder model which exposed rows are still unfetched, requests them
//! from a [`RowSource`](crate::source::RowSource), and feeds the responses
//! back into both models.

mod config;
mod fetch;
mod geometry;
mod renderer;
mod table;

pub use config::*;
pub use fetch::*;
pub use geometry::*;
pub use renderer::*;
pub use table::*;
