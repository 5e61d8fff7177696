//! Row height estimation and exposed-region calculation.

use std::ops::Range;

use super::ScrollConfig;

/// Pixel geometry of a scroll table.
///
/// Until a real row has been measured the configured default height is
/// used. Heights of zero are ignored so the row height is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollGeometry {
    default_row_height: u32,
    observed_row_height: Option<u32>,
    viewport_height: u32,
    overscan_rows: usize,
}

impl ScrollGeometry {
    /// Creates geometry from a config.
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            default_row_height: config.default_row_height.max(1),
            observed_row_height: None,
            viewport_height: config.viewport_height,
            overscan_rows: config.overscan_rows,
        }
    }

    /// Records the measured height of a rendered row.
    pub fn observe_row_height(&mut self, height: u32) {
        if height > 0 {
            self.observed_row_height = Some(height);
        }
    }

    /// Returns `true` once a real row height has been observed.
    pub fn has_observed_row_height(&self) -> bool {
        self.observed_row_height.is_some()
    }

    /// Current row height, measured or estimated.
    pub fn row_height(&self) -> u32 {
        self.observed_row_height.unwrap_or(self.default_row_height)
    }

    /// Sets the viewport height, e.g. after a resize.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    /// Returns the viewport height.
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Number of whole rows that fit in the viewport, at least one.
    pub fn page_size(&self) -> usize {
        ((self.viewport_height / self.row_height()) as usize).max(1)
    }

    /// Pixel offset of the top of row `index`.
    pub fn row_offset(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.row_height())
    }

    /// Pixel height of a table with `total` rows.
    pub fn total_height(&self, total: usize) -> u64 {
        self.row_offset(total)
    }

    /// Index of the row under the top edge of the viewport.
    pub fn first_visible_row(&self, scroll_offset: u32) -> usize {
        (scroll_offset / self.row_height()) as usize
    }

    /// Rows that are on screen at `scroll_offset`, widened by the overscan
    /// and clamped to `[0, total)`.
    pub fn exposed_rows(&self, scroll_offset: u32, total: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }
        let first = self.first_visible_row(scroll_offset);
        let visible = (self.viewport_height.div_ceil(self.row_height()) as usize).max(1);
        let start = first.saturating_sub(self.overscan_rows).min(total);
        let end = first
            .saturating_add(visible)
            .saturating_add(self.overscan_rows)
            .min(total);
        start..end
    }
}
