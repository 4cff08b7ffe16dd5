//! Column and filter state for a grid
//!
//! Owns the column definitions and the per-column filter text, and derives
//! option lists for select-type filters from the full row set.

use std::collections::HashSet;

use gridkit_core::{CellValue, ColumnDefinition, GridError, Result, Row, SelectOption};

use crate::filter_types::FilterState;
use crate::filtering::column_passes;
use crate::sorting::compare_cells;

/// Column list plus filter state.
///
/// `columns_revision` changes only when the column set (or its visibility)
/// changes, never on filter edits, so header cells keyed by it keep their
/// identity while the user types into a filter box.
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    columns: Vec<ColumnDefinition>,
    filters: FilterState,
    columns_revision: u64,
}

impl FilterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: Vec<ColumnDefinition>) -> Self {
        let mut controller = Self::new();
        controller.set_columns(columns);
        controller
    }

    /// Replace the column set. The filter state is re-initialized to one
    /// empty entry per column.
    pub fn set_columns(&mut self, columns: Vec<ColumnDefinition>) {
        self.filters = FilterState::for_columns(columns.iter().map(|c| c.key.clone()));
        self.columns = columns;
        self.columns_revision += 1;
        tracing::debug!(
            columns = self.columns.len(),
            revision = self.columns_revision,
            "Column set replaced, filters reset"
        );
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn columns_revision(&self) -> u64 {
        self.columns_revision
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key)
    }

    /// Update the filter text of one column, leaving the others untouched
    pub fn set_filter(&mut self, key: &str, text: impl Into<String>) -> Result<()> {
        if self.column(key).is_none() {
            return Err(GridError::UnknownColumn(key.to_string()));
        }
        self.filters.set(key, text);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_values();
    }

    /// Show or hide a column. A hidden column's filter text is kept but no
    /// longer applied.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<()> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))?;
        if column.visible != visible {
            column.visible = visible;
            self.columns_revision += 1;
        }
        Ok(())
    }

    /// Non-empty filters of visible columns
    pub fn active_filters(&self) -> FilterState {
        self.filters
            .active()
            .filter(|(key, _)| self.column(key).is_some_and(|c| c.visible))
            .collect()
    }

    /// True if the row passes every active filter
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.active().all(|(key, text)| {
            let applies = self.column(key).is_some_and(|c| c.visible);
            !applies || column_passes(row.get(key), text)
        })
    }

    /// Columns with option lists derived from `rows` for select-type filters.
    ///
    /// `rows` should be the full loaded set, not the filtered view, so the
    /// options always cover every value a user could broaden back to.
    pub fn columns_with_options(&self, rows: &[Row]) -> Vec<ColumnDefinition> {
        self.columns
            .iter()
            .map(|column| {
                let mut column = column.clone();
                if column.filter_type.uses_options() {
                    column.options = distinct_options(rows, &column.key);
                }
                column
            })
            .collect()
    }
}

/// Distinct non-null values of a column, ascending.
///
/// Equal values keep the position of their first occurrence relative to each
/// other. Null and missing cells are skipped.
pub fn distinct_values(rows: &[Row], key: &str) -> Vec<CellValue> {
    let mut seen = HashSet::new();
    let mut values: Vec<CellValue> = rows
        .iter()
        .filter_map(|row| row.get(key))
        .filter(|value| !value.is_null())
        .filter(|value| seen.insert(dedup_key(value)))
        .cloned()
        .collect();
    values.sort_by(compare_cells);
    values
}

/// Option list for a select filter, built from [`distinct_values`]
pub fn distinct_options(rows: &[Row], key: &str) -> Vec<SelectOption> {
    distinct_values(rows, key)
        .into_iter()
        .map(|value| {
            let text = value.display_text();
            SelectOption::new(text.clone(), text)
        })
        .collect()
}

fn dedup_key(value: &CellValue) -> String {
    match value {
        CellValue::Null => "z".to_string(),
        CellValue::Bool(b) => format!("b:{b}"),
        // -0.0 and 0.0 are the same value
        CellValue::Number(n) => format!("n:{}", (n + 0.0).to_bits()),
        CellValue::String(s) => format!("s:{s}"),
        CellValue::Json(v) => format!("j:{v}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_core::FilterType;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("article", "Article"),
            ColumnDefinition::new("maker", "Manufacturer").with_filter_type(FilterType::Select),
            ColumnDefinition::new("price", "Price").editable(),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("article", "A1").with("maker", "Zeta").with("price", 10),
            Row::new().with("article", "A2").with("maker", "Acme").with("price", 20),
            Row::new().with("article", "A3").with("maker", "Zeta").with("price", 5),
            Row::new().with("article", "A4").with("maker", CellValue::Null),
        ]
    }

    #[test]
    fn test_set_columns_initializes_one_entry_per_column() {
        let controller = FilterController::with_columns(columns());
        assert_eq!(controller.filters().len(), 3);
        assert!(controller.filters().iter().all(|(_, text)| text.is_empty()));
    }

    #[test]
    fn test_set_filter_is_shallow_merge() {
        let mut controller = FilterController::with_columns(columns());
        controller.set_filter("article", "a1").unwrap();
        controller.set_filter("price", ">5").unwrap();
        controller.set_filter("article", "a2").unwrap();

        assert_eq!(controller.filter("article"), Some("a2"));
        assert_eq!(controller.filter("price"), Some(">5"));
        assert_eq!(controller.filter("maker"), Some(""));
    }

    #[test]
    fn test_set_filter_rejects_unknown_column() {
        let mut controller = FilterController::with_columns(columns());
        assert_eq!(
            controller.set_filter("nope", "x"),
            Err(GridError::UnknownColumn("nope".to_string()))
        );
    }

    #[test]
    fn test_filter_edits_keep_columns_revision() {
        let mut controller = FilterController::with_columns(columns());
        let revision = controller.columns_revision();
        controller.set_filter("article", "a").unwrap();
        assert_eq!(controller.columns_revision(), revision);

        controller.set_columns(columns());
        assert_eq!(controller.columns_revision(), revision + 1);
        assert_eq!(controller.filter("article"), Some(""));
    }

    #[test]
    fn test_hidden_column_filter_is_inert() {
        let mut controller = FilterController::with_columns(columns());
        controller.set_filter("price", ">15").unwrap();
        let row = Row::new().with("article", "A1").with("price", 10);
        assert!(!controller.matches(&row));

        controller.set_column_visible("price", false).unwrap();
        assert!(controller.matches(&row));
        // The text itself is not purged
        assert_eq!(controller.filter("price"), Some(">15"));
        assert!(controller.active_filters().is_empty());
    }

    #[test]
    fn test_distinct_values_sorted_without_duplicates() {
        let values = distinct_values(&rows(), "maker");
        assert_eq!(
            values,
            vec![CellValue::from("Acme"), CellValue::from("Zeta")]
        );

        let prices = distinct_values(&rows(), "price");
        assert_eq!(
            prices,
            vec![
                CellValue::Number(5.0),
                CellValue::Number(10.0),
                CellValue::Number(20.0)
            ]
        );
    }

    #[test]
    fn test_options_come_from_full_row_set() {
        let mut controller = FilterController::with_columns(columns());
        controller.set_filter("maker", "Zeta").unwrap();

        let with_options = controller.columns_with_options(&rows());
        let maker = with_options.iter().find(|c| c.key == "maker").unwrap();
        assert_eq!(
            maker.options,
            vec![SelectOption::new("Acme", "Acme"), SelectOption::new("Zeta", "Zeta")]
        );

        // Textbox columns get no options
        let article = with_options.iter().find(|c| c.key == "article").unwrap();
        assert!(article.options.is_empty());
    }
}
