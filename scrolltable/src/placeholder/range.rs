//! Placeholder range value

use std::ops::Range;

/// A half-open row range `[start, stop)`.
///
/// A range without content is a placeholder: its rows have not been
/// fetched. A range with content is materialized, and the content is
/// whatever handle the view rendered those rows into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<R> {
    start: usize,
    stop: usize,
    content: Option<R>,
}

impl<R> Placeholder<R> {
    /// Callers guarantee `start < stop`.
    pub(super) fn new_unchecked(start: usize, stop: usize, content: Option<R>) -> Self {
        Self { start, stop, content }
    }

    /// First row index covered.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last row index covered.
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Returns the covered indices as a `Range`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Always `false` for ranges built through the model.
    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    /// Returns `true` if `row` lies inside the range.
    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row < self.stop
    }

    /// Returns `true` if the range carries content.
    pub fn is_materialized(&self) -> bool {
        self.content.is_some()
    }

    /// Returns the content handle, if materialized.
    pub fn content(&self) -> Option<&R> {
        self.content.as_ref()
    }

    /// Returns the content handle mutably, if materialized.
    pub fn content_mut(&mut self) -> Option<&mut R> {
        self.content.as_mut()
    }

    /// Consumes the range and returns its content handle.
    pub fn into_content(self) -> Option<R> {
        self.content
    }

    pub(super) fn shrink(&mut self) {
        self.stop -= 1;
    }

    pub(super) fn shift_up(&mut self) {
        self.start -= 1;
        self.stop -= 1;
    }
}
