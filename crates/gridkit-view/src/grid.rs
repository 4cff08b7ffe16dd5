//! Grid model: rows plus filtering, sorting, selection, and cell editing
//!
//! Row identity comes from a caller-supplied key getter, so selection and
//! edits survive reloading or re-sorting the rows. Grids without a key
//! getter identify rows by their position in the loaded set.

use std::collections::HashMap;
use std::sync::Arc;

use gridkit_core::{CellValue, ColumnDefinition, GridError, Result, Row, RowKey};
use indexmap::IndexSet;

use crate::controller::FilterController;
use crate::filtering::matches_search;
use crate::sorting::SortState;

/// Produces the identity of a row
pub type KeyGetter = Arc<dyn Fn(&Row) -> RowKey + Send + Sync>;

/// Called after a cell edit with the full row set and the change applied
pub type RowsChangedCallback = Box<dyn FnMut(&[Row], &RowChange) -> anyhow::Result<()> + Send>;

/// Called after the selection changes
pub type SelectionChangedCallback =
    Box<dyn FnMut(&IndexSet<RowKey>) -> anyhow::Result<()> + Send>;

/// A single applied cell edit
#[derive(Debug, Clone, PartialEq)]
pub struct RowChange {
    pub row_key: RowKey,
    pub column_key: String,
    pub previous: Option<CellValue>,
    pub value: CellValue,
}

pub struct GridModel {
    rows: Vec<Row>,
    keys: Vec<RowKey>,
    row_index: HashMap<RowKey, usize>,
    controller: FilterController,
    sort: SortState,
    search: Option<String>,
    key_getter: Option<KeyGetter>,
    selected: IndexSet<RowKey>,
    on_rows_changed: Option<RowsChangedCallback>,
    on_selection_changed: Option<SelectionChangedCallback>,
}

impl std::fmt::Debug for GridModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridModel")
            .field("rows", &self.rows.len())
            .field("controller", &self.controller)
            .field("sort", &self.sort)
            .field("search", &self.search)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl GridModel {
    pub fn new(columns: Vec<ColumnDefinition>, key_getter: KeyGetter) -> Self {
        Self::build(columns, Some(key_getter))
    }

    /// Grid whose row keys are the row positions (`"0"`, `"1"`, ...)
    pub fn positional(columns: Vec<ColumnDefinition>) -> Self {
        Self::build(columns, None)
    }

    fn build(columns: Vec<ColumnDefinition>, key_getter: Option<KeyGetter>) -> Self {
        Self {
            rows: Vec::new(),
            keys: Vec::new(),
            row_index: HashMap::new(),
            controller: FilterController::with_columns(columns),
            sort: SortState::new(),
            search: None,
            key_getter,
            selected: IndexSet::new(),
            on_rows_changed: None,
            on_selection_changed: None,
        }
    }

    /// Grid whose row identity is the display text of one column
    pub fn keyed_by_column(columns: Vec<ColumnDefinition>, key_column: &str) -> Self {
        let key_column = key_column.to_string();
        Self::new(
            columns,
            Arc::new(move |row: &Row| {
                RowKey(row.get(&key_column).map(|v| v.display_text()).unwrap_or_default())
            }),
        )
    }

    pub fn on_rows_changed(&mut self, callback: RowsChangedCallback) {
        self.on_rows_changed = Some(callback);
    }

    pub fn on_selection_changed(&mut self, callback: SelectionChangedCallback) {
        self.on_selection_changed = Some(callback);
    }

    /// Replace the loaded rows. Selected keys that no longer exist are dropped.
    pub fn set_rows(&mut self, rows: Vec<Row>) -> Result<()> {
        let keys: Vec<RowKey> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| match &self.key_getter {
                Some(getter) => getter(row),
                None => RowKey(idx.to_string()),
            })
            .collect();

        let mut row_index = HashMap::with_capacity(rows.len());
        for (idx, key) in keys.iter().enumerate() {
            if row_index.insert(key.clone(), idx).is_some() {
                return Err(GridError::DuplicateRowKey(key.0.clone()));
            }
        }

        self.rows = rows;
        self.keys = keys;
        self.row_index = row_index;

        let before = self.selected.len();
        let row_index = &self.row_index;
        self.selected.retain(|key| row_index.contains_key(key));
        if self.selected.len() != before {
            self.notify_selection_changed();
        }

        tracing::debug!(rows = self.rows.len(), "Grid rows replaced");
        Ok(())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Key of the row at `idx` in [`rows`](Self::rows)
    pub fn row_key(&self, idx: usize) -> Option<&RowKey> {
        self.keys.get(idx)
    }

    pub fn row_by_key(&self, key: &RowKey) -> Option<&Row> {
        self.row_index.get(key).map(|&idx| &self.rows[idx])
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FilterController {
        &mut self.controller
    }

    /// Shorthand for updating one column filter
    pub fn set_filter(&mut self, key: &str, text: impl Into<String>) -> Result<()> {
        self.controller.set_filter(key, text)
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortState {
        &mut self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search.filter(|s| !s.is_empty());
    }

    /// Indices of the rows to display: filtered, searched, then sorted
    pub fn visible_indices(&self) -> Vec<usize> {
        let search = self.search.as_deref().unwrap_or("");
        let mut indices: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.controller.matches(row) && matches_search(row, search))
            .map(|(idx, _)| idx)
            .collect();
        self.sort.sort_indices(&self.rows, &mut indices);
        indices
    }

    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible_indices()
            .into_iter()
            .map(|idx| &self.rows[idx])
            .collect()
    }

    /// Columns with select options derived from every loaded row
    pub fn columns_with_options(&self) -> Vec<ColumnDefinition> {
        self.controller.columns_with_options(&self.rows)
    }

    /// Edit one cell.
    ///
    /// The local row is updated before the rows-changed callback runs; a
    /// failing callback is logged and does not undo the edit. When the edit
    /// changes the row's key, the row and any selection of it move to the new
    /// key; an edit whose new key belongs to another row is undone and
    /// rejected.
    pub fn update_cell(
        &mut self,
        row_key: &RowKey,
        column_key: &str,
        value: CellValue,
    ) -> Result<()> {
        let column = self
            .controller
            .column(column_key)
            .ok_or_else(|| GridError::UnknownColumn(column_key.to_string()))?;
        if !column.editable {
            return Err(GridError::ColumnNotEditable(column_key.to_string()));
        }
        let idx = *self
            .row_index
            .get(row_key)
            .ok_or_else(|| GridError::RowNotFound(row_key.to_string()))?;

        let previous = self.rows[idx].set(column_key, value.clone());
        let new_key = match &self.key_getter {
            Some(getter) => getter(&self.rows[idx]),
            None => row_key.clone(),
        };
        if &new_key != row_key {
            if self.row_index.contains_key(&new_key) {
                match previous {
                    Some(previous) => self.rows[idx].set(column_key, previous),
                    None => self.rows[idx].remove(column_key),
                };
                return Err(GridError::DuplicateRowKey(new_key.0));
            }
            self.rekey(idx, row_key, new_key.clone());
        }

        let change = RowChange {
            row_key: new_key,
            column_key: column_key.to_string(),
            previous,
            value,
        };

        if let Some(callback) = self.on_rows_changed.as_mut() {
            if let Err(err) = callback(&self.rows, &change) {
                tracing::warn!(
                    error = %err,
                    row = %change.row_key,
                    column = %change.column_key,
                    "Rows-changed callback failed; keeping local edit"
                );
            }
        }
        Ok(())
    }

    fn rekey(&mut self, idx: usize, old_key: &RowKey, new_key: RowKey) {
        self.row_index.remove(old_key);
        self.row_index.insert(new_key.clone(), idx);
        self.keys[idx] = new_key.clone();

        if let Some(pos) = self.selected.get_index_of(old_key) {
            self.selected.shift_remove_index(pos);
            self.selected.shift_insert(pos, new_key.clone());
            self.notify_selection_changed();
        }
        tracing::debug!(old = %old_key, new = %new_key, "Row key changed by edit");
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn selected_keys(&self) -> &IndexSet<RowKey> {
        &self.selected
    }

    /// Selected rows in selection order
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selected
            .iter()
            .filter_map(|key| self.row_by_key(key))
            .collect()
    }

    pub fn set_selected(&mut self, key: &RowKey, selected: bool) -> Result<()> {
        if !self.row_index.contains_key(key) {
            return Err(GridError::RowNotFound(key.to_string()));
        }
        let changed = if selected {
            self.selected.insert(key.clone())
        } else {
            self.selected.shift_remove(key)
        };
        if changed {
            self.notify_selection_changed();
        }
        Ok(())
    }

    pub fn toggle_selected(&mut self, key: &RowKey) -> Result<()> {
        let selected = self.is_selected(key);
        self.set_selected(key, !selected)
    }

    /// Select every row currently visible
    pub fn select_all_visible(&mut self) {
        let keys: Vec<RowKey> = self
            .visible_indices()
            .into_iter()
            .map(|idx| self.keys[idx].clone())
            .collect();
        let mut changed = false;
        for key in keys {
            changed |= self.selected.insert(key);
        }
        if changed {
            self.notify_selection_changed();
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify_selection_changed();
        }
    }

    fn notify_selection_changed(&mut self) {
        if let Some(callback) = self.on_selection_changed.as_mut() {
            if let Err(err) = callback(&self.selected) {
                tracing::warn!(
                    error = %err,
                    selected = self.selected.len(),
                    "Selection-changed callback failed"
                );
            }
        }
    }
}
