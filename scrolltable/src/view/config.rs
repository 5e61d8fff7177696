//! Scroll table configuration

use serde::Deserialize;
use serde::Serialize;

/// Sizing and fetch settings for a [`ScrollTable`](super::ScrollTable).
///
/// Deserializes from partial documents; missing keys take their defaults.
///
/// # Example
///
/// ```
/// use scrolltable::view::ScrollConfig;
///
/// let config = ScrollConfig::default()
///     .with_viewport_height(600)
///     .with_max_fetch_rows(50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Row height in pixels assumed until a real row has been measured.
    ///
    /// Default: 20
    pub default_row_height: u32,

    /// Height of the scrolling viewport in pixels.
    ///
    /// Default: 400
    pub viewport_height: u32,

    /// Extra rows fetched above and below the visible window.
    ///
    /// Default: 10
    pub overscan_rows: usize,

    /// Largest row count requested from the source in one request.
    ///
    /// Default: 100
    pub max_fetch_rows: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            default_row_height: 20,
            viewport_height: 400,
            overscan_rows: 10,
            max_fetch_rows: 100,
        }
    }
}

impl ScrollConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the estimated row height.
    pub fn with_default_row_height(mut self, height: u32) -> Self {
        self.default_row_height = height;
        self
    }

    /// Sets the viewport height.
    pub fn with_viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    /// Sets the overscan row count.
    pub fn with_overscan_rows(mut self, rows: usize) -> Self {
        self.overscan_rows = rows;
        self
    }

    /// Sets the per-request row cap.
    pub fn with_max_fetch_rows(mut self, rows: usize) -> Self {
        self.max_fetch_rows = rows;
        self
    }
}
