//! Fetch bookkeeping types

use std::ops::Range;

/// A range of rows the table wants from its source.
///
/// Requests are stamped with the table generation they were planned in, so
/// a response arriving after a reset can be recognised and dropped. Each
/// also carries a sequence number that identifies its claim while the table
/// renumbers rows underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    seq: u64,
    /// Table generation at planning time.
    pub generation: u64,
    /// First row index requested.
    pub offset: usize,
    /// Number of rows requested.
    pub count: usize,
}

impl FetchRequest {
    pub(crate) fn new(seq: u64, generation: u64, offset: usize, count: usize) -> Self {
        Self {
            seq,
            generation,
            offset,
            count,
        }
    }

    /// Sequence number, unique within the table that planned the request.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// One past the last row index requested.
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    /// The requested indices as a `Range`.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// What [`apply_fetch`](super::ScrollTable::apply_fetch) did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The rows were installed; holds how many.
    Applied(usize),
    /// The table was reset after the request was planned.
    Stale,
    /// The range is no longer an unfetched placeholder, or the response was
    /// already handled.
    Superseded,
    /// The source returned nothing for rows the table still expects. The
    /// source has shrunk; the table holds off fetching until it is refilled.
    Exhausted,
}
