//! Tests for the scroll table fetch cycle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use simplelog::{Config, LevelFilter, SimpleLogger};

use scrolltable::error::{ModelError, SourceError, TableError};
use scrolltable::model::{Row, RowId};
use scrolltable::selection::{EventLog, RowEvent};
use scrolltable::source::{InMemoryRowSource, RowSource};
use scrolltable::view::{
    BlockRenderer, FetchOutcome, FetchRequest, RowBlock, ScrollConfig, ScrollTable,
};

/// A source whose calls can be made to fail on demand.
#[derive(Debug, Default)]
struct FlakySource {
    inner: InMemoryRowSource,
    fail_size: AtomicBool,
    fail_ranges: AtomicBool,
    range_requests: AtomicUsize,
}

impl FlakySource {
    fn new(count: usize) -> Self {
        Self {
            inner: InMemoryRowSource::new(mailbox(count)),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RowSource for FlakySource {
    async fn request_row_range(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Row>, SourceError> {
        self.range_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_ranges.load(Ordering::SeqCst) {
            return Err(SourceError::server(503, "mailbox busy"));
        }
        self.inner.request_row_range(offset, count).await
    }

    async fn request_current_size(&self) -> Result<usize, SourceError> {
        if self.fail_size.load(Ordering::SeqCst) {
            return Err(SourceError::transport("connection reset"));
        }
        self.inner.request_current_size().await
    }
}

type Table = ScrollTable<FlakySource, BlockRenderer>;

fn init_logging() {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
}

fn mailbox(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            Row::new(format!("m{i}"))
                .set("subject", format!("Message {i}"))
                .set("read", false)
        })
        .collect()
}

/// Ten-pixel rows in a fifty-pixel viewport: five rows per screen.
fn config() -> ScrollConfig {
    ScrollConfig::default()
        .with_default_row_height(10)
        .with_viewport_height(50)
        .with_overscan_rows(0)
}

fn table(count: usize, config: ScrollConfig) -> Table {
    init_logging();
    ScrollTable::new(FlakySource::new(count), BlockRenderer::new(), config)
}

fn layout(table: &Table) -> Vec<(usize, usize, bool)> {
    table
        .placeholders()
        .placeholders()
        .map(|p| (p.start(), p.stop(), p.is_materialized()))
        .collect()
}

/// Planned requests as `(offset, count)` pairs.
fn spans(requests: &[FetchRequest]) -> Vec<(usize, usize)> {
    requests.iter().map(|r| (r.offset, r.count)).collect()
}

fn id(s: &str) -> RowId {
    RowId::from(s)
}

#[tokio::test]
async fn test_refill_loads_first_page() {
    let mut table = table(100, config());
    let installed = table.empty_and_refill().await.unwrap();

    assert_eq!(installed, 5);
    assert_eq!(table.total(), 100);
    assert_eq!(table.generation(), 1);
    assert_eq!(layout(&table), vec![(0, 5, true), (5, 100, false)]);
    assert_eq!(table.rows().row_count(), 5);
    assert_eq!(table.rows().row_at(3).map(|r| r.id().clone()), Some(id("m3")));
    assert!(table.in_flight().is_empty());
}

#[tokio::test]
async fn test_scroll_materializes_middle_of_placeholder() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.scroll_to(500).await.unwrap();

    assert_eq!(
        layout(&table),
        vec![(0, 5, true), (5, 50, false), (50, 55, true), (55, 100, false)]
    );
    assert_eq!(table.rows().row_index(&id("m52")), Some(52));

    // Scrolling back over fetched rows issues nothing.
    let before = table.source().range_requests.load(Ordering::SeqCst);
    assert_eq!(table.scroll_to(0).await.unwrap(), 0);
    assert_eq!(table.source().range_requests.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn test_scroll_to_end_of_placeholder() {
    let mut table = table(20, config());
    table.empty_and_refill().await.unwrap();
    table.scroll_to(150).await.unwrap();
    assert_eq!(layout(&table), vec![(0, 5, true), (5, 15, false), (15, 20, true)]);
}

#[tokio::test]
async fn test_requests_are_chunked() {
    let mut table = table(100, config().with_max_fetch_rows(2));
    table.empty_and_refill().await.unwrap();
    assert_eq!(
        layout(&table),
        vec![(0, 2, true), (2, 4, true), (4, 5, true), (5, 100, false)]
    );
}

#[tokio::test]
async fn test_in_flight_rows_are_not_planned_twice() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);

    let first = table.plan_fetches();
    assert_eq!(spans(&first), vec![(5, 5)]);
    assert_eq!(first[0].generation, 1);
    assert!(table.plan_fetches().is_empty());

    table.fetch_failed(&first[0]);
    assert!(table.in_flight().is_empty());
    let again = table.plan_fetches();
    assert_eq!(spans(&again), spans(&first));
    assert_ne!(again[0].seq(), first[0].seq());
}

#[tokio::test]
async fn test_planning_around_partial_claims() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);
    let claimed = table.plan_fetches();

    table.geometry_mut().set_viewport_height(150);
    let more = table.plan_fetches();
    assert_eq!(spans(&claimed), vec![(5, 5)]);
    assert_eq!(spans(&more), vec![(10, 5)]);
    assert_eq!(table.in_flight().len(), 2);
}

#[tokio::test]
async fn test_stale_response_is_dropped() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);
    let request = table.plan_fetches().remove(0);
    let rows = table
        .source()
        .request_row_range(request.offset, request.count)
        .await
        .unwrap();

    table.empty_and_refill().await.unwrap();
    let before = layout(&table);
    assert_eq!(table.apply_fetch(request, rows).unwrap(), FetchOutcome::Stale);
    assert_eq!(layout(&table), before);
    assert_eq!(table.rows().row_count(), 10);
}

#[tokio::test]
async fn test_duplicate_response_is_superseded() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);
    let request = table.plan_fetches().remove(0);
    let rows = table
        .source()
        .request_row_range(request.offset, request.count)
        .await
        .unwrap();

    assert_eq!(table.apply_fetch(request, rows.clone()).unwrap(), FetchOutcome::Applied(5));
    assert_eq!(table.apply_fetch(request, rows).unwrap(), FetchOutcome::Superseded);
    assert_eq!(layout(&table), vec![(0, 5, true), (5, 10, true), (10, 100, false)]);
}

#[tokio::test]
async fn test_range_failure_leaves_placeholders() {
    let mut table = table(30, config());
    table.source().fail_ranges.store(true, Ordering::SeqCst);

    let err = table.empty_and_refill().await.unwrap_err();
    assert_eq!(err.as_source().and_then(SourceError::status_code), Some(503));
    assert_eq!(layout(&table), vec![(0, 30, false)]);
    assert!(table.in_flight().is_empty());
    assert!(table.rows().is_empty());

    table.source().fail_ranges.store(false, Ordering::SeqCst);
    assert_eq!(table.fill_exposed().await.unwrap(), 5);
}

#[tokio::test]
async fn test_size_failure_leaves_table_unchanged() {
    let mut table = table(30, config());
    table.empty_and_refill().await.unwrap();
    let before = layout(&table);

    table.source().fail_size.store(true, Ordering::SeqCst);
    let err = table.empty_and_refill().await.unwrap_err();
    assert!(matches!(err, TableError::Source(SourceError::Transport(_))));
    assert_eq!(table.generation(), 1);
    assert_eq!(layout(&table), before);
    assert_eq!(table.rows().row_count(), 5);
}

#[tokio::test]
async fn test_short_response_keeps_remaining_placeholder() {
    let mut table = table(10, config());
    table.empty_and_refill().await.unwrap();
    for i in 6..10 {
        table.source().inner.remove(&id(&format!("m{i}"))).await;
    }

    assert_eq!(table.scroll_to(50).await.unwrap(), 1);
    assert_eq!(layout(&table), vec![(0, 5, true), (5, 6, true), (6, 10, false)]);
}

#[tokio::test]
async fn test_remove_row_shrinks_holding_range() {
    let mut table = table(100, config());
    let log = EventLog::new();
    table.add_observer(Box::new(log.clone()));
    table.empty_and_refill().await.unwrap();
    table.rows_mut().activate_row(&id("m2")).unwrap();
    log.take();

    let removed = table.remove_row(&id("m2")).unwrap();
    assert_eq!(removed.id(), &id("m2"));
    assert_eq!(log.take(), vec![RowEvent::Deactivated(id("m2"))]);
    assert_eq!(layout(&table), vec![(0, 4, true), (4, 99, false)]);
    assert_eq!(table.total(), 99);
    assert_eq!(table.rows().row_index(&id("m3")), Some(2));

    let block: &RowBlock = table
        .placeholders()
        .placeholder_with_index(0)
        .unwrap()
        .content()
        .unwrap();
    assert_eq!(block.ids, vec![id("m0"), id("m1"), id("m3"), id("m4")]);
}

#[tokio::test]
async fn test_remove_only_row_of_range_prunes_it() {
    let mut table = table(100, config().with_max_fetch_rows(1));
    table.empty_and_refill().await.unwrap();

    table.remove_row(&id("m1")).unwrap();
    assert_eq!(
        layout(&table),
        vec![(0, 1, true), (1, 2, true), (2, 3, true), (3, 4, true), (4, 99, false)]
    );
    assert_eq!(table.rows().row_at(1).map(|r| r.id().clone()), Some(id("m2")));
}

#[tokio::test]
async fn test_remove_row_renumbers_in_flight_requests() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);
    let request = table.plan_fetches().remove(0);
    assert_eq!(request.offset, 5);

    table.remove_row(&id("m0")).unwrap();
    assert_eq!(spans(table.in_flight()), vec![(4, 5)]);
    assert_eq!(table.in_flight()[0].seq(), request.seq());
}

#[tokio::test]
async fn test_response_after_removal_lands_on_renumbered_rows() {
    let mut table = table(100, config());
    table.empty_and_refill().await.unwrap();
    table.geometry_mut().set_viewport_height(100);
    let request = table.plan_fetches().remove(0);
    let rows = table
        .source()
        .request_row_range(request.offset, request.count)
        .await
        .unwrap();

    // The row goes away while [5, 10) is still being fetched.
    table.remove_row(&id("m0")).unwrap();
    assert_eq!(table.apply_fetch(request, rows).unwrap(), FetchOutcome::Applied(5));

    assert!(table.in_flight().is_empty());
    assert_eq!(layout(&table), vec![(0, 4, true), (4, 9, true), (9, 99, false)]);
    assert_eq!(table.rows().row_index(&id("m4")), Some(3));
    assert_eq!(table.rows().row_index(&id("m5")), Some(4));
    assert_eq!(table.rows().row_index(&id("m9")), Some(8));
    assert_eq!(spans(&table.plan_fetches()), vec![(9, 1)]);
}

#[tokio::test]
async fn test_huge_fetch_cap_does_not_overflow() {
    let mut table = table(100, config().with_max_fetch_rows(usize::MAX));
    table.empty_and_refill().await.unwrap();
    assert_eq!(table.scroll_to(500).await.unwrap(), 5);
    assert_eq!(
        layout(&table),
        vec![(0, 5, true), (5, 50, false), (50, 55, true), (55, 100, false)]
    );
}

#[tokio::test]
async fn test_empty_response_flags_refill() {
    let mut table = table(10, config());
    table.empty_and_refill().await.unwrap();
    for i in 5..10 {
        table.source().inner.remove(&id(&format!("m{i}"))).await;
    }

    table.geometry_mut().set_viewport_height(100);
    let request = table.plan_fetches().remove(0);
    let rows = table
        .source()
        .request_row_range(request.offset, request.count)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(table.apply_fetch(request, rows).unwrap(), FetchOutcome::Exhausted);
    assert!(table.needs_refill());
    assert!(table.in_flight().is_empty());

    // Nothing more is asked of the source until the refill.
    let before = table.source().range_requests.load(Ordering::SeqCst);
    assert_eq!(table.fill_exposed().await.unwrap(), 0);
    assert_eq!(table.source().range_requests.load(Ordering::SeqCst), before);

    table.empty_and_refill().await.unwrap();
    assert!(!table.needs_refill());
    assert_eq!(table.total(), 5);
    assert_eq!(layout(&table), vec![(0, 5, true)]);
}

#[tokio::test]
async fn test_remove_unknown_row() {
    let mut table = table(10, config());
    table.empty_and_refill().await.unwrap();
    let err = table.remove_row(&id("nope")).unwrap_err();
    assert!(matches!(err, TableError::Model(ModelError::UnknownRow(_))));
    assert_eq!(table.total(), 10);
}

#[tokio::test]
async fn test_refill_deactivates_active_row_once() {
    let mut table = table(10, config());
    let log = EventLog::new();
    table.add_observer(Box::new(log.clone()));
    table.empty_and_refill().await.unwrap();
    table.rows_mut().select_row(&id("m1")).unwrap();
    table.rows_mut().activate_row(&id("m0")).unwrap();
    log.take();

    table.empty_and_refill().await.unwrap();
    assert_eq!(log.take(), vec![RowEvent::Deactivated(id("m0"))]);
    assert_eq!(table.generation(), 2);
    assert!(!table.rows().is_selected(&id("m1")));
}

#[tokio::test]
async fn test_empty_source() {
    let mut table = table(0, config());
    assert_eq!(table.empty_and_refill().await.unwrap(), 0);
    assert_eq!(table.placeholders().placeholder_count(), 0);
    assert_eq!(table.exposed_rows(), 0..0);
}
