//! Placeholder range tracking for lazily fetched rows.
//!
//! A virtualized table knows how many rows it has long before it knows what
//! is in them. [`PlaceholderModel`] records, for every index range, whether
//! the rows there are still unfetched placeholders or have been
//! materialized into some caller-owned content handle.

mod range;

pub use range::*;

use std::ops::Range;

use log::{debug, warn};

use crate::error::ModelError;

/// Ordered, disjoint `[start, stop)` ranges over a table of `total` rows.
///
/// The ranges are kept sorted by `start`. Adjacent ranges are never merged,
/// and gaps between ranges are allowed. The content type `R` is opaque: the
/// model stores and returns it but never looks inside.
///
/// # Example
///
/// ```
/// use scrolltable::placeholder::PlaceholderModel;
///
/// let mut model: PlaceholderModel<&str> = PlaceholderModel::new();
/// model.register_initial_placeholder(5, None);
///
/// let fetched = PlaceholderModel::create_placeholder(0, 2, Some("rows 0-1"))?;
/// let rest = PlaceholderModel::create_placeholder(2, 5, None)?;
/// model.divide_placeholder(0, fetched, rest)?;
///
/// assert_eq!(model.placeholder_count(), 2);
/// assert_eq!(model.find_placeholder_index_for_row_index(3), Some(1));
/// # Ok::<(), scrolltable::error::ModelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PlaceholderModel<R> {
    total: usize,
    ranges: Vec<Placeholder<R>>,
}

impl<R> Default for PlaceholderModel<R> {
    fn default() -> Self {
        Self {
            total: 0,
            ranges: Vec::new(),
        }
    }
}

impl<R> PlaceholderModel<R> {
    /// Creates a model with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the model to a single range covering `[0, total)`.
    ///
    /// A table with no rows gets no ranges at all.
    pub fn register_initial_placeholder(&mut self, total: usize, content: Option<R>) {
        self.total = total;
        self.ranges.clear();
        if total > 0 {
            self.ranges.push(Placeholder::new_unchecked(0, total, content));
        }
        debug!("[placeholders] initial placeholder [0, {})", total);
    }

    /// Builds a range value. The model is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidRange`] if `start >= stop`.
    pub fn create_placeholder(
        start: usize,
        stop: usize,
        content: Option<R>,
    ) -> Result<Placeholder<R>, ModelError> {
        if start >= stop {
            return Err(ModelError::InvalidRange { start, stop });
        }
        Ok(Placeholder::new_unchecked(start, stop, content))
    }

    /// Returns the total row count the model was seeded with, less removals.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of ranges.
    pub fn placeholder_count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if there are no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterates over the ranges in row order.
    pub fn placeholders(&self) -> std::slice::Iter<'_, Placeholder<R>> {
        self.ranges.iter()
    }

    /// Returns the range at sequence position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] if there is no
    /// such position.
    pub fn placeholder_with_index(&self, index: usize) -> Result<&Placeholder<R>, ModelError> {
        let count = self.ranges.len();
        self.ranges
            .get(index)
            .ok_or(ModelError::PlaceholderIndexOutOfBounds { index, count })
    }

    /// Returns the content of the range at sequence position `index` for
    /// in-place updates, or `None` if that range is unfetched.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] if there is no
    /// such position.
    pub fn content_with_index_mut(&mut self, index: usize) -> Result<Option<&mut R>, ModelError> {
        self.check_index(index)?;
        Ok(self.ranges[index].content_mut())
    }

    /// Overwrites the range at sequence position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] for a bad position
    /// and [`ModelError::OverlappingPlaceholder`] if the new range would
    /// overlap a neighbour. The model is unchanged on error.
    pub fn replace_placeholder(
        &mut self,
        index: usize,
        placeholder: Placeholder<R>,
    ) -> Result<(), ModelError> {
        self.check_index(index)?;
        self.check_fits(index, placeholder.range())?;
        debug!(
            "[placeholders] replace #{} with [{}, {}) materialized={}",
            index,
            placeholder.start(),
            placeholder.stop(),
            placeholder.is_materialized()
        );
        self.ranges[index] = placeholder;
        Ok(())
    }

    /// Replaces the range at sequence position `index` with `above`
    /// followed by `below`, growing the sequence by one.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] for a bad position
    /// and [`ModelError::OverlappingPlaceholder`] if `above` and `below`
    /// overlap each other or a neighbour. The model is unchanged on error.
    pub fn divide_placeholder(
        &mut self,
        index: usize,
        above: Placeholder<R>,
        below: Placeholder<R>,
    ) -> Result<(), ModelError> {
        self.check_index(index)?;
        if above.stop() > below.start() {
            return Err(ModelError::OverlappingPlaceholder {
                start: below.start(),
                stop: below.stop(),
            });
        }
        self.check_fits(index, above.start()..below.stop())?;
        debug!(
            "[placeholders] divide #{} into [{}, {}) and [{}, {})",
            index,
            above.start(),
            above.stop(),
            below.start(),
            below.stop()
        );
        self.ranges[index] = above;
        self.ranges.insert(index + 1, below);
        Ok(())
    }

    /// Drops the last row of the range at sequence position `index`. Its
    /// start and content are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] for a bad position
    /// and [`ModelError::InvalidRange`] if the range covers a single row;
    /// use [`remove_placeholder`](Self::remove_placeholder) for that.
    pub fn shrink_placeholder(&mut self, index: usize) -> Result<(), ModelError> {
        self.check_index(index)?;
        let placeholder = &mut self.ranges[index];
        if placeholder.len() == 1 {
            return Err(ModelError::InvalidRange {
                start: placeholder.start(),
                stop: placeholder.start(),
            });
        }
        placeholder.shrink();
        debug!(
            "[placeholders] shrank #{} to [{}, {})",
            index,
            placeholder.start(),
            placeholder.stop()
        );
        Ok(())
    }

    /// Removes the range at sequence position `index`, leaving a gap.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PlaceholderIndexOutOfBounds`] if there is no
    /// such position.
    pub fn remove_placeholder(&mut self, index: usize) -> Result<Placeholder<R>, ModelError> {
        self.check_index(index)?;
        let removed = self.ranges.remove(index);
        debug!("[placeholders] removed #{} [{}, {})", index, removed.start(), removed.stop());
        Ok(removed)
    }

    /// Returns the sequence position of the range containing `row`, or
    /// `None` if `row` falls in a gap or past the end.
    pub fn find_placeholder_index_for_row_index(&self, row: usize) -> Option<usize> {
        let index = self.ranges.partition_point(|p| p.stop() <= row);
        self.ranges
            .get(index)
            .filter(|p| p.contains(row))
            .map(|_| index)
    }

    /// Returns the sequence position of the first range that starts strictly
    /// after `row`. A range starting exactly at `row` does not count.
    pub fn find_first_placeholder_index_after_row_index(&self, row: usize) -> Option<usize> {
        let index = self.ranges.partition_point(|p| p.start() <= row);
        (index < self.ranges.len()).then_some(index)
    }

    /// Accounts for the row at `row` having been deleted from the table.
    ///
    /// Every range starting after `row` moves up by one on both bounds.
    /// Ranges starting at or before `row` are left alone, including one that
    /// contains it; callers that delete a row inside a range are expected to
    /// shrink or remove that range themselves.
    pub fn removed_row(&mut self, row: usize) {
        let first_shifted = self.ranges.partition_point(|p| p.start() <= row);
        for placeholder in &mut self.ranges[first_shifted..] {
            placeholder.shift_up();
        }
        if row < self.total {
            self.total -= 1;
        }

        if first_shifted > 0
            && let Some(shifted) = self.ranges.get(first_shifted)
            && self.ranges[first_shifted - 1].stop() > shifted.start()
        {
            warn!(
                "[placeholders] removing row {} left [{}, {}) overlapping its predecessor",
                row,
                shifted.start(),
                shifted.stop()
            );
        }
        debug!(
            "[placeholders] removed row {}, shifted {} ranges",
            row,
            self.ranges.len() - first_shifted
        );
    }

    fn check_index(&self, index: usize) -> Result<(), ModelError> {
        if index >= self.ranges.len() {
            return Err(ModelError::PlaceholderIndexOutOfBounds {
                index,
                count: self.ranges.len(),
            });
        }
        Ok(())
    }

    /// Checks that `span` fits between the neighbours of the range at
    /// sequence position `index`.
    fn check_fits(&self, index: usize, span: Range<usize>) -> Result<(), ModelError> {
        let overlaps_previous = index > 0 && self.ranges[index - 1].stop() > span.start;
        let overlaps_next = self
            .ranges
            .get(index + 1)
            .is_some_and(|next| span.end > next.start());
        if overlaps_previous || overlaps_next {
            return Err(ModelError::OverlappingPlaceholder {
                start: span.start,
                stop: span.end,
            });
        }
        Ok(())
    }
}
