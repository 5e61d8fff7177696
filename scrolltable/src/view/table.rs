//! Scroll table state.

use std::ops::Range;

use futures::future::join_all;
use log::{debug, trace, warn};

use super::FetchOutcome;
use super::FetchRequest;
use super::RowRenderer;
use super::ScrollConfig;
use super::ScrollGeometry;
use crate::error::ModelError;
use crate::error::TableError;
use crate::model::Row;
use crate::model::RowId;
use crate::placeholder::PlaceholderModel;
use crate::selection::RowObserver;
use crate::selection::RowSelectionModel;
use crate::source::RowSource;

/// A virtualized table over a lazily fetched row source.
///
/// `ScrollTable` owns one [`RowSelectionModel`] and one
/// [`PlaceholderModel`] and keeps them in step:
/// - scrolling plans fetches for the exposed placeholder rows
/// - responses materialize ranges and register rows
/// - deleting a row updates both models
/// - `empty_and_refill` starts a new generation and ignores older responses
///
/// # Example
///
/// ```ignore
/// let source = InMemoryRowSource::new(rows);
/// let mut table = ScrollTable::new(source, BlockRenderer::new(), ScrollConfig::default());
/// table.empty_and_refill().await?;
/// table.scroll_to(2_000).await?;
/// ```
pub struct ScrollTable<S, N: RowRenderer> {
    source: S,
    renderer: N,
    geometry: ScrollGeometry,
    max_fetch_rows: usize,
    rows: RowSelectionModel,
    placeholders: PlaceholderModel<N::Node>,
    /// Vertical scroll offset in pixels.
    scroll_offset: u32,
    /// Bumped on every reset.
    generation: u64,
    /// Requests planned but not yet applied or failed.
    in_flight: Vec<FetchRequest>,
    next_seq: u64,
    /// Set when the source came back short; cleared by a refill.
    needs_refill: bool,
}

impl<S, N: RowRenderer> std::fmt::Debug for ScrollTable<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTable")
            .field("rows", &self.rows)
            .field("placeholders", &self.placeholders.placeholder_count())
            .field("scroll_offset", &self.scroll_offset)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .field("needs_refill", &self.needs_refill)
            .finish()
    }
}

impl<S: RowSource, N: RowRenderer> ScrollTable<S, N> {
    /// Creates an empty table. Call [`empty_and_refill`](Self::empty_and_refill)
    /// to load it.
    pub fn new(source: S, renderer: N, config: ScrollConfig) -> Self {
        Self {
            source,
            renderer,
            geometry: ScrollGeometry::new(&config),
            max_fetch_rows: config.max_fetch_rows.max(1),
            rows: RowSelectionModel::new(),
            placeholders: PlaceholderModel::new(),
            scroll_offset: 0,
            generation: 0,
            in_flight: Vec::new(),
            next_seq: 0,
            needs_refill: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Returns the row model.
    pub fn rows(&self) -> &RowSelectionModel {
        &self.rows
    }

    /// Returns the row model for selection and activation changes.
    pub fn rows_mut(&mut self) -> &mut RowSelectionModel {
        &mut self.rows
    }

    /// Returns the placeholder model.
    pub fn placeholders(&self) -> &PlaceholderModel<N::Node> {
        &self.placeholders
    }

    /// Returns the geometry.
    pub fn geometry(&self) -> &ScrollGeometry {
        &self.geometry
    }

    /// Returns the geometry for row-height and viewport updates.
    pub fn geometry_mut(&mut self) -> &mut ScrollGeometry {
        &mut self.geometry
    }

    /// Returns the row source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &N {
        &self.renderer
    }

    /// Registers an observer on the row model.
    pub fn add_observer(&mut self, observer: Box<dyn RowObserver>) {
        self.rows.add_observer(observer);
    }

    /// Current reset generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Total row count.
    pub fn total(&self) -> usize {
        self.placeholders.total()
    }

    /// Current scroll offset in pixels.
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    /// Requests planned but not yet applied or failed.
    pub fn in_flight(&self) -> &[FetchRequest] {
        &self.in_flight
    }

    /// Returns `true` once the source has returned no rows for a range the
    /// table still expected. No further fetches are planned until
    /// [`empty_and_refill`](Self::empty_and_refill) succeeds.
    pub fn needs_refill(&self) -> bool {
        self.needs_refill
    }

    /// Rows currently exposed by the viewport, overscan included.
    pub fn exposed_rows(&self) -> Range<usize> {
        self.geometry.exposed_rows(self.scroll_offset, self.total())
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Discards every row and reloads from the source.
    ///
    /// The current size is fetched first; if that fails the table is left as
    /// it was. Otherwise a new generation starts, so responses to requests
    /// planned before the reset are dropped when they arrive.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Source`] if the size request or any row request
    /// fails.
    pub async fn empty_and_refill(&mut self) -> Result<usize, TableError> {
        let total = self.source.request_current_size().await?;

        self.generation += 1;
        self.in_flight.clear();
        self.needs_refill = false;
        self.rows.empty();
        self.placeholders.register_initial_placeholder(total, None);
        let max_offset = self.geometry.total_height(total).min(u64::from(u32::MAX)) as u32;
        self.scroll_offset = self.scroll_offset.min(max_offset);
        debug!("[table] generation {} with {} rows", self.generation, total);

        self.fill_exposed().await
    }

    /// Scrolls to `offset` pixels and fetches whatever became exposed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Source`] if a row request fails.
    pub async fn scroll_to(&mut self, offset: u32) -> Result<usize, TableError> {
        self.scroll_offset = offset;
        self.fill_exposed().await
    }

    /// Fetches every unfetched exposed row.
    ///
    /// All planned requests run concurrently and their responses are applied
    /// in row order. A failed request releases its claim and leaves its
    /// placeholder in place; the first error is returned once every response
    /// has been handled.
    ///
    /// Returns the number of rows installed.
    ///
    /// # Errors
    ///
    /// Returns the first [`TableError`] met while handling responses.
    pub async fn fill_exposed(&mut self) -> Result<usize, TableError> {
        let requests = self.plan_fetches();
        if requests.is_empty() {
            return Ok(0);
        }

        let source = &self.source;
        let responses = join_all(
            requests
                .iter()
                .map(|request| source.request_row_range(request.offset, request.count)),
        )
        .await;

        let mut installed = 0;
        let mut first_error: Option<TableError> = None;
        for (request, response) in requests.into_iter().zip(responses) {
            match response {
                Ok(rows) => match self.apply_fetch(request, rows) {
                    Ok(FetchOutcome::Applied(count)) => installed += count,
                    Ok(_) => {}
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                },
                Err(err) => {
                    warn!("[table] fetch of rows {:?} failed: {}", request.range(), err);
                    self.fetch_failed(&request);
                    first_error.get_or_insert(err.into());
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(installed),
        }
    }

    /// Plans requests for the unfetched rows in the exposed region.
    ///
    /// Rows already claimed by an in-flight request are skipped, so calling
    /// this again before the responses arrive never asks for the same row
    /// twice. Every returned request is recorded as in flight until it is
    /// passed to [`apply_fetch`](Self::apply_fetch) or
    /// [`fetch_failed`](Self::fetch_failed).
    ///
    /// Nothing is planned while the table [needs a refill](Self::needs_refill).
    pub fn plan_fetches(&mut self) -> Vec<FetchRequest> {
        if self.needs_refill {
            debug!("[table] refill pending, not planning fetches");
            return Vec::new();
        }
        let exposed = self.exposed_rows();
        let mut requests = Vec::new();
        let mut row = exposed.start;

        while row < exposed.end {
            let index = match self.placeholders.find_placeholder_index_for_row_index(row) {
                Some(index) => index,
                None => {
                    // In a gap: skip ahead to the next range, if any.
                    let next = self
                        .placeholders
                        .find_first_placeholder_index_after_row_index(row)
                        .and_then(|next| self.placeholders.placeholder_with_index(next).ok());
                    match next {
                        Some(placeholder) => {
                            row = placeholder.start();
                            continue;
                        }
                        None => break,
                    }
                }
            };

            let Ok(placeholder) = self.placeholders.placeholder_with_index(index) else {
                break;
            };
            let (stop, materialized) = (placeholder.stop(), placeholder.is_materialized());
            if !materialized {
                self.claim(row, stop.min(exposed.end), &mut requests);
            }
            row = stop;
        }

        if !requests.is_empty() {
            trace!("[table] planned {} fetches for exposed rows {:?}", requests.len(), exposed);
        }
        requests
    }

    /// Splits `[start, stop)` into requests around existing claims.
    fn claim(&mut self, start: usize, stop: usize, requests: &mut Vec<FetchRequest>) {
        let mut cursor = start;
        while cursor < stop {
            if let Some(claimed_end) = self
                .in_flight
                .iter()
                .find(|request| request.range().contains(&cursor))
                .map(FetchRequest::end)
            {
                cursor = claimed_end;
                continue;
            }
            let next_claim = self
                .in_flight
                .iter()
                .map(|request| request.offset)
                .filter(|&offset| offset > cursor && offset < stop)
                .min()
                .unwrap_or(stop);
            let end = next_claim.min(cursor.saturating_add(self.max_fetch_rows));

            let request = FetchRequest::new(self.next_seq, self.generation, cursor, end - cursor);
            self.next_seq += 1;
            self.in_flight.push(request);
            requests.push(request);
            cursor = end;
        }
    }

    /// Installs the rows returned for `request`.
    ///
    /// Responses from an older generation are dropped. So are responses
    /// whose claim was already released, and responses for a range that is
    /// no longer covered by a single unfetched placeholder. Otherwise the
    /// rows are rendered into a materialized range, which replaces the
    /// placeholder or splits it, and each row is registered with the row
    /// model.
    ///
    /// The rows are installed where the claim stands now, which differs from
    /// `request.offset` if earlier rows were removed in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Model`] if the placeholder model rejects the
    /// new layout; the models are unchanged in that case.
    pub fn apply_fetch(
        &mut self,
        request: FetchRequest,
        mut rows: Vec<Row>,
    ) -> Result<FetchOutcome, TableError> {
        if request.generation != self.generation {
            debug!(
                "[table] dropping stale rows {:?} from generation {}",
                request.range(),
                request.generation
            );
            return Ok(FetchOutcome::Stale);
        }
        let Some(claim) = self.release(&request) else {
            debug!("[table] rows {:?} already handled, dropping", request.range());
            return Ok(FetchOutcome::Superseded);
        };

        rows.truncate(claim.count);
        if rows.is_empty() {
            warn!("[table] source returned no rows for {:?}, refill needed", claim.range());
            self.needs_refill = true;
            return Ok(FetchOutcome::Exhausted);
        }

        let start = claim.offset;
        let end = start + rows.len();
        let Some(index) = self.placeholders.find_placeholder_index_for_row_index(start) else {
            debug!("[table] rows {:?} fall in a gap, dropping", start..end);
            return Ok(FetchOutcome::Superseded);
        };
        let placeholder = self.placeholders.placeholder_with_index(index)?;
        if placeholder.is_materialized() || end > placeholder.stop() {
            debug!("[table] rows {:?} already materialized, dropping", start..end);
            return Ok(FetchOutcome::Superseded);
        }
        let (outer_start, outer_stop) = (placeholder.start(), placeholder.stop());

        let node = self.renderer.render_rows(start, &rows);
        let fetched = PlaceholderModel::create_placeholder(start, end, Some(node))?;
        match (start == outer_start, end == outer_stop) {
            (true, true) => self.placeholders.replace_placeholder(index, fetched)?,
            (true, false) => {
                let below = PlaceholderModel::create_placeholder(end, outer_stop, None)?;
                self.placeholders.divide_placeholder(index, fetched, below)?;
            }
            (false, true) => {
                let above = PlaceholderModel::create_placeholder(outer_start, start, None)?;
                self.placeholders.divide_placeholder(index, above, fetched)?;
            }
            (false, false) => {
                let above = PlaceholderModel::create_placeholder(outer_start, start, None)?;
                let rest = PlaceholderModel::create_placeholder(start, outer_stop, None)?;
                let below = PlaceholderModel::create_placeholder(end, outer_stop, None)?;
                self.placeholders.divide_placeholder(index, above, rest)?;
                self.placeholders.divide_placeholder(index + 1, fetched, below)?;
            }
        }

        let count = rows.len();
        for (offset, row) in rows.into_iter().enumerate() {
            self.rows.set_row_data(start + offset, row);
        }
        debug!("[table] materialized rows {:?}", start..end);
        Ok(FetchOutcome::Applied(count))
    }

    /// Releases the claim of a request whose fetch failed. The models are
    /// not touched, so the rows will be planned again.
    pub fn fetch_failed(&mut self, request: &FetchRequest) {
        self.release(request);
    }

    /// Drops the claim made for `request` and returns it as it stands now.
    fn release(&mut self, request: &FetchRequest) -> Option<FetchRequest> {
        let position = self
            .in_flight
            .iter()
            .position(|claimed| claimed.seq() == request.seq())?;
        Some(self.in_flight.remove(position))
    }

    // -------------------------------------------------------------------------
    // Row removal
    // -------------------------------------------------------------------------

    /// Deletes a row from the table.
    ///
    /// The materialized range holding the row loses it (or disappears if the
    /// row was all it held), every later range moves up one index, in-flight
    /// claims after the row are renumbered, and the row model drops the row.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the row is not loaded.
    pub fn remove_row(&mut self, id: &RowId) -> Result<Row, TableError> {
        let index = self
            .rows
            .row_index(id)
            .ok_or_else(|| ModelError::unknown_row(id))?;

        if let Some(range_index) = self.placeholders.find_placeholder_index_for_row_index(index) {
            let holder = self.placeholders.placeholder_with_index(range_index)?;
            let (holder_start, holder_len) = (holder.start(), holder.len());
            if holder_len == 1 {
                self.placeholders.remove_placeholder(range_index)?;
            } else {
                if let Some(node) = self.placeholders.content_with_index_mut(range_index)? {
                    self.renderer.row_removed(node, index - holder_start);
                }
                self.placeholders.shrink_placeholder(range_index)?;
            }
        }
        self.placeholders.removed_row(index);

        for request in &mut self.in_flight {
            if request.offset > index {
                request.offset -= 1;
            }
        }

        Ok(self.rows.remove_row(id)?)
    }
}
