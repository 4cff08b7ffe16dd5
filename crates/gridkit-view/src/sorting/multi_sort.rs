//! Multi-column sorting for grids
//!
//! Provides multi-column sorting with null handling and SQL ORDER BY clause generation.

use std::cmp::Ordering;

use gridkit_core::{CellValue, Row};
use serde::{Deserialize, Serialize};

use crate::filter_types::SortDirection;

/// A column to sort by with its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    /// Column key in the row
    pub column_key: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortColumn {
    /// Create a new sort column
    pub fn new(column_key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_key: column_key.into(),
            direction,
        }
    }

    /// Create ascending sort column
    pub fn ascending(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortDirection::Ascending)
    }

    /// Create descending sort column
    pub fn descending(column_key: impl Into<String>) -> Self {
        Self::new(column_key, SortDirection::Descending)
    }
}

/// Configuration for null value handling in sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPosition {
    /// NULL values appear first
    First,
    /// NULL values appear last (default, matches SQL behavior)
    #[default]
    Last,
}

impl NullPosition {
    /// Get display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// Ordered sort configuration.
///
/// The first column is the primary key. A column key appears at most once;
/// an empty state leaves rows in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    /// Columns to sort by, in priority order (first = highest priority)
    columns: Vec<SortColumn>,
    /// How to handle NULL and missing values
    null_position: NullPosition,
}

impl SortState {
    /// Create a new empty sort state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with null position configuration
    pub fn with_null_position(null_position: NullPosition) -> Self {
        Self {
            columns: Vec::new(),
            null_position,
        }
    }

    /// Build from a list of columns; later duplicates of a key are dropped
    pub fn from_columns(columns: impl IntoIterator<Item = SortColumn>) -> Self {
        let mut state = Self::new();
        for column in columns {
            if state.position(&column.column_key).is_none() {
                state.columns.push(column);
            }
        }
        state
    }

    fn position(&self, column_key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column_key == column_key)
    }

    /// Sort by `column_key`. An existing entry keeps its priority and only
    /// changes direction; a new entry becomes the lowest priority.
    pub fn set(&mut self, column_key: impl Into<String>, direction: SortDirection) {
        let column_key = column_key.into();
        match self.position(&column_key) {
            Some(idx) => self.columns[idx].direction = direction,
            None => self.columns.push(SortColumn::new(column_key, direction)),
        }
    }

    /// Cycle a column through ascending, descending, and unsorted
    pub fn toggle(&mut self, column_key: &str) {
        match self.position(column_key) {
            None => self.columns.push(SortColumn::ascending(column_key)),
            Some(idx) => match self.columns[idx].direction {
                SortDirection::Ascending => {
                    self.columns[idx].direction = SortDirection::Descending
                }
                SortDirection::Descending => {
                    self.columns.remove(idx);
                }
            },
        }
    }

    /// Remove a column, returning true if it was present
    pub fn remove(&mut self, column_key: &str) -> bool {
        match self.position(column_key) {
            Some(idx) => {
                self.columns.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Clear all sort columns
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Check if any sort columns are configured
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get the number of sort columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the sort columns
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// Direction a column is currently sorted in, if any
    pub fn direction_of(&self, column_key: &str) -> Option<SortDirection> {
        self.position(column_key).map(|idx| self.columns[idx].direction)
    }

    /// Get null position configuration
    pub fn null_position(&self) -> NullPosition {
        self.null_position
    }

    /// Set null position configuration
    pub fn set_null_position(&mut self, position: NullPosition) {
        self.null_position = position;
    }

    /// Compare two cells with null handling. NULL and missing compare equal.
    fn compare_values(&self, a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
        let a_is_null = a.is_none_or(CellValue::is_null);
        let b_is_null = b.is_none_or(CellValue::is_null);

        match (a, b, a_is_null, b_is_null) {
            (_, _, true, true) => Ordering::Equal,
            (_, _, true, false) => match self.null_position {
                NullPosition::First => Ordering::Less,
                NullPosition::Last => Ordering::Greater,
            },
            (_, _, false, true) => match self.null_position {
                NullPosition::First => Ordering::Greater,
                NullPosition::Last => Ordering::Less,
            },
            (Some(va), Some(vb), false, false) => compare_cells(va, vb),
            _ => Ordering::Equal,
        }
    }

    /// Compare two rows using all configured sort columns
    pub fn compare_rows(&self, row_a: &Row, row_b: &Row) -> Ordering {
        for sort_col in &self.columns {
            let ordering =
                self.compare_values(row_a.get(&sort_col.column_key), row_b.get(&sort_col.column_key));

            if ordering != Ordering::Equal {
                return match sort_col.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
            }
        }
        Ordering::Equal
    }

    /// Sort rows in place. The sort is stable: rows that tie on every sort
    /// column keep their relative order.
    pub fn sort_rows(&self, rows: &mut [Row]) {
        if self.is_empty() {
            return;
        }
        rows.sort_by(|a, b| self.compare_rows(a, b));
    }

    /// Reorder a list of indices into `rows` (e.g. the filtered subset)
    pub fn sort_indices(&self, rows: &[Row], indices: &mut [usize]) {
        if self.is_empty() {
            return;
        }
        indices.sort_by(|&a, &b| self.compare_rows(&rows[a], &rows[b]));
    }

    /// Generate SQL ORDER BY clause fragment (without the "ORDER BY" keyword)
    pub fn to_order_by(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let escaped_col = format!("\"{}\"", col.column_key.replace('"', "\"\""));
                format!(
                    "{} {} {}",
                    escaped_col,
                    col.direction.label(),
                    self.null_position.label()
                )
            })
            .collect();

        Some(parts.join(", "))
    }
}

/// Three-way comparison of two non-null cells.
///
/// Numbers compare numerically and strings by UTF-16 code unit, so characters
/// outside the Basic Multilingual Plane order by their surrogates. Booleans order
/// with numbers as 0 and 1, as loose comparison does. Cells of kinds that
/// have no natural order between them (a string against a number, nested
/// JSON) order by kind: numeric, then string, then JSON. NaN sorts after
/// every other number. This keeps the comparator a total order, which the
/// stable sort requires.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::String(a), CellValue::String(b)) => a.encode_utf16().cmp(b.encode_utf16()),
        (CellValue::Json(a), CellValue::Json(b)) => a.to_string().cmp(&b.to_string()),
        _ => match (numeric_value(a), numeric_value(b)) {
            (Some(na), Some(nb)) => compare_numbers(na, nb),
            _ => kind_rank(a).cmp(&kind_rank(b)),
        },
    }
}

fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

fn kind_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Null => 0,
        CellValue::Bool(_) | CellValue::Number(_) => 1,
        CellValue::String(_) => 2,
        CellValue::Json(_) => 3,
    }
}
