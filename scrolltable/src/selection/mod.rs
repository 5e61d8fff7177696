//! Row selection and activation bookkeeping.
//!
//! [`RowSelectionModel`] owns every row the table currently knows about,
//! keyed by [`RowId`]. On top of the row store it tracks a multi-row
//! selection and a single active (focused) row, and tells registered
//! [`RowObserver`]s when either changes.

mod observer;

pub use observer::*;

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use log::{debug, trace};

use crate::error::ModelError;
use crate::model::Row;
use crate::model::RowId;

/// The set of known rows plus selection and activation state.
///
/// Rows are registered with an advisory index (their position in the
/// table). The index is used for neighbour lookups only; the id is the
/// authoritative key.
///
/// # Example
///
/// ```
/// use scrolltable::model::{Row, RowId};
/// use scrolltable::selection::RowSelectionModel;
///
/// let mut model = RowSelectionModel::new();
/// model.set_row_data(0, Row::new("a"));
/// model.set_row_data(1, Row::new("b"));
///
/// model.activate_row(&"b".into())?;
/// let mut visited = Vec::new();
/// model.visit_selected_rows(|row| visited.push(row.id().clone()));
///
/// // Nothing is selected, so the active row stands in for the selection.
/// assert_eq!(visited, vec![RowId::from("b")]);
/// # Ok::<(), scrolltable::error::ModelError>(())
/// ```
#[derive(Default)]
pub struct RowSelectionModel {
    rows: HashMap<RowId, Row>,
    /// Advisory table index -> row id.
    positions: BTreeMap<usize, RowId>,
    /// Row id -> advisory table index.
    indices: HashMap<RowId, usize>,
    selected: HashSet<RowId>,
    active: Option<RowId>,
    observers: Vec<Box<dyn RowObserver>>,
}

impl std::fmt::Debug for RowSelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSelectionModel")
            .field("rows", &self.rows.len())
            .field("selected", &self.selected)
            .field("active", &self.active)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl RowSelectionModel {
    /// Creates an empty model with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Current state is not replayed to it.
    pub fn add_observer(&mut self, observer: Box<dyn RowObserver>) {
        self.observers.push(observer);
    }

    // -------------------------------------------------------------------------
    // Row store
    // -------------------------------------------------------------------------

    /// Registers or overwrites a row, keyed by its id.
    ///
    /// If the row was known at a different index it moves to `index`. If a
    /// different row was registered at `index`, that row is dropped the
    /// same way [`remove_row`](Self::remove_row) drops a row, except that
    /// later indices are not shifted.
    ///
    /// Returns the previous data for the same id, if any.
    pub fn set_row_data(&mut self, index: usize, row: Row) -> Option<Row> {
        let id = row.id().clone();

        if let Some(old_index) = self.indices.get(&id).copied()
            && old_index != index
        {
            self.positions.remove(&old_index);
        }

        if let Some(displaced) = self.positions.get(&index).cloned()
            && displaced != id
        {
            debug!("[rows] row {} displaced by {} at index {}", displaced, id, index);
            self.indices.remove(&displaced);
            self.selected.remove(&displaced);
            if let Some(row) = self.rows.remove(&displaced)
                && self.active.as_ref() == Some(&displaced)
            {
                self.active = None;
                Self::notify(&mut self.observers, &row, |o, r| o.row_deactivated(r));
            }
        }

        self.positions.insert(index, id.clone());
        self.indices.insert(id.clone(), index);
        self.rows.insert(id, row)
    }

    /// Deletes a row.
    ///
    /// If the row was active a deactivation is emitted. If it was selected it
    /// silently leaves the selection. Every row registered after it moves up
    /// one index.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn remove_row(&mut self, id: &RowId) -> Result<Row, ModelError> {
        let row = self.rows.remove(id).ok_or_else(|| ModelError::unknown_row(id))?;

        if let Some(index) = self.indices.remove(id) {
            self.positions.remove(&index);
            let later = self.positions.split_off(&index);
            for (old_index, later_id) in later {
                self.indices.insert(later_id.clone(), old_index - 1);
                self.positions.insert(old_index - 1, later_id);
            }
        }

        self.selected.remove(id);

        if self.active.as_ref() == Some(id) {
            self.active = None;
            Self::notify(&mut self.observers, &row, |o, r| o.row_deactivated(r));
        }

        debug!("[rows] removed row {}", id);
        Ok(row)
    }

    /// Clears every row, the selection and the active row.
    ///
    /// Emits one deactivation if a row was active, and nothing otherwise.
    pub fn empty(&mut self) {
        if let Some(active) = self.active.take()
            && let Some(row) = self.rows.get(&active)
        {
            Self::notify(&mut self.observers, row, |o, r| o.row_deactivated(r));
        }
        self.rows.clear();
        self.positions.clear();
        self.indices.clear();
        self.selected.clear();
        debug!("[rows] emptied");
    }

    /// Returns the row with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn row(&self, id: &RowId) -> Result<&Row, ModelError> {
        self.rows.get(id).ok_or_else(|| ModelError::unknown_row(id))
    }

    /// Returns a mutable reference to the row with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn row_mut(&mut self, id: &RowId) -> Result<&mut Row, ModelError> {
        self.rows.get_mut(id).ok_or_else(|| ModelError::unknown_row(id))
    }

    /// Returns `true` if the id is registered.
    pub fn contains(&self, id: &RowId) -> bool {
        self.rows.contains_key(id)
    }

    /// Returns the number of registered rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows are registered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index the row was registered at.
    pub fn row_index(&self, id: &RowId) -> Option<usize> {
        self.indices.get(id).copied()
    }

    /// Returns the row registered at `index`.
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.positions.get(&index).and_then(|id| self.rows.get(id))
    }

    /// Returns the nearest registered row after `id` by index.
    pub fn next_row(&self, id: &RowId) -> Option<&Row> {
        let index = self.row_index(id)?;
        self.positions
            .range(index + 1..)
            .next()
            .and_then(|(_, next)| self.rows.get(next))
    }

    /// Returns the nearest registered row before `id` by index.
    pub fn previous_row(&self, id: &RowId) -> Option<&Row> {
        let index = self.row_index(id)?;
        self.positions
            .range(..index)
            .next_back()
            .and_then(|(_, previous)| self.rows.get(previous))
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Adds a row to the selection and emits `row_selected`.
    ///
    /// The event fires even if the row was already selected.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn select_row(&mut self, id: &RowId) -> Result<(), ModelError> {
        let row = self.rows.get(id).ok_or_else(|| ModelError::unknown_row(id))?;
        self.selected.insert(id.clone());
        trace!("[rows] selected {}", id);
        Self::notify(&mut self.observers, row, |o, r| o.row_selected(r));
        Ok(())
    }

    /// Removes a row from the selection and emits `row_unselected`.
    ///
    /// The event fires even if the row was not selected.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn unselect_row(&mut self, id: &RowId) -> Result<(), ModelError> {
        let row = self.rows.get(id).ok_or_else(|| ModelError::unknown_row(id))?;
        self.selected.remove(id);
        trace!("[rows] unselected {}", id);
        Self::notify(&mut self.observers, row, |o, r| o.row_unselected(r));
        Ok(())
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns the ids of the selected rows, in no particular order.
    pub fn selected_ids(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    /// Calls `visitor` for each selected row.
    ///
    /// If nothing is selected but a row is active, `visitor` is called once
    /// with the active row. If neither, it is never called.
    pub fn visit_selected_rows<F>(&self, mut visitor: F)
    where
        F: FnMut(&Row),
    {
        if self.selected.is_empty() {
            if let Some(row) = self.active_row() {
                visitor(row);
            }
            return;
        }
        for id in &self.selected {
            if let Some(row) = self.rows.get(id) {
                visitor(row);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Makes a row the active row.
    ///
    /// When a different row is active, `row_deactivated` is emitted for it
    /// before `row_activated` is emitted for the new one. Activating the row
    /// that is already active emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownRow`] if the id is not registered.
    pub fn activate_row(&mut self, id: &RowId) -> Result<(), ModelError> {
        let row = self.rows.get(id).ok_or_else(|| ModelError::unknown_row(id))?;
        if self.active.as_ref() == Some(id) {
            return Ok(());
        }

        if let Some(previous) = self.active.take()
            && let Some(previous_row) = self.rows.get(&previous)
        {
            Self::notify(&mut self.observers, previous_row, |o, r| o.row_deactivated(r));
        }

        self.active = Some(id.clone());
        trace!("[rows] activated {}", id);
        Self::notify(&mut self.observers, row, |o, r| o.row_activated(r));
        Ok(())
    }

    /// Clears the active row and emits `row_deactivated`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoActiveRow`] if no row is active.
    pub fn deactivate_row(&mut self) -> Result<(), ModelError> {
        let id = self.active.take().ok_or(ModelError::NoActiveRow)?;
        if let Some(row) = self.rows.get(&id) {
            trace!("[rows] deactivated {}", id);
            Self::notify(&mut self.observers, row, |o, r| o.row_deactivated(r));
        }
        Ok(())
    }

    /// Returns the active row, if any.
    pub fn active_row(&self) -> Option<&Row> {
        self.active.as_ref().and_then(|id| self.rows.get(id))
    }

    /// Returns the id of the active row, if any.
    pub fn active_id(&self) -> Option<&RowId> {
        self.active.as_ref()
    }

    fn notify(
        observers: &mut [Box<dyn RowObserver>],
        row: &Row,
        event: fn(&mut Box<dyn RowObserver>, &Row),
    ) {
        for observer in observers.iter_mut() {
            event(observer, row);
        }
    }
}
