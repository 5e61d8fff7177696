//! Row selection observers.

use std::sync::Arc;
use std::sync::Mutex;

use crate::model::Row;
use crate::model::RowId;

/// Receives selection and activation changes from a
/// [`RowSelectionModel`](super::RowSelectionModel).
///
/// All methods default to doing nothing, so a view only overrides the
/// notifications it renders.
pub trait RowObserver: Send {
    /// A row was added to the selection.
    fn row_selected(&mut self, _row: &Row) {}

    /// A row was removed from the selection.
    fn row_unselected(&mut self, _row: &Row) {}

    /// A row became the active row.
    fn row_activated(&mut self, _row: &Row) {}

    /// A row stopped being the active row.
    fn row_deactivated(&mut self, _row: &Row) {}
}

/// A single observer notification, by row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    /// See [`RowObserver::row_selected`].
    Selected(RowId),
    /// See [`RowObserver::row_unselected`].
    Unselected(RowId),
    /// See [`RowObserver::row_activated`].
    Activated(RowId),
    /// See [`RowObserver::row_deactivated`].
    Deactivated(RowId),
}

impl RowEvent {
    /// Returns the id of the affected row.
    pub fn row_id(&self) -> &RowId {
        match self {
            Self::Selected(id)
            | Self::Unselected(id)
            | Self::Activated(id)
            | Self::Deactivated(id) => id,
        }
    }
}

/// An observer that records every notification it receives.
///
/// Clones share the same log, so one clone can be handed to the model while
/// another is kept to inspect the events.
///
/// # Example
///
/// ```
/// use scrolltable::model::Row;
/// use scrolltable::selection::{EventLog, RowEvent, RowSelectionModel};
///
/// let log = EventLog::new();
/// let mut model = RowSelectionModel::new();
/// model.add_observer(Box::new(log.clone()));
/// model.set_row_data(0, Row::new("a"));
/// model.activate_row(&"a".into()).unwrap();
///
/// assert_eq!(log.take(), vec![RowEvent::Activated("a".into())]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RowEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<RowEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Returns the recorded events and clears the log.
    pub fn take(&self) -> Vec<RowEvent> {
        self.events
            .lock()
            .map(|mut g| std::mem::take(&mut *g))
            .unwrap_or_default()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, event: RowEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

impl RowObserver for EventLog {
    fn row_selected(&mut self, row: &Row) {
        self.push(RowEvent::Selected(row.id().clone()));
    }

    fn row_unselected(&mut self, row: &Row) {
        self.push(RowEvent::Unselected(row.id().clone()));
    }

    fn row_activated(&mut self, row: &Row) {
        self.push(RowEvent::Activated(row.id().clone()));
    }

    fn row_deactivated(&mut self, row: &Row) {
        self.push(RowEvent::Deactivated(row.id().clone()));
    }
}
