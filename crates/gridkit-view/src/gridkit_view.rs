//! gridkit View - In-memory filtering, sorting, and selection for tabular grids
//!
//! This crate holds the logic behind an editable, filterable grid:
//!
//! - [`filtering`] - Per-column filter predicates (substring and numeric comparison)
//! - [`sorting`] - Stable multi-column sort
//! - [`FilterController`] - Column list, filter state, and distinct option lists
//! - [`GridModel`] - Rows plus filtering, sorting, selection, and cell editing
//!
//! Everything here is synchronous and operates on already-loaded rows.

mod controller;
pub mod filter_types;
pub mod filtering;
mod grid;
pub mod sorting;

pub use controller::{FilterController, distinct_options, distinct_values};
pub use filter_types::{ComparisonOperator, FilterState, NumericFilter, SortDirection};
pub use filtering::{column_passes, evaluate, filter_indices, matches_search};
pub use grid::{GridModel, KeyGetter, RowChange, RowsChangedCallback, SelectionChangedCallback};
pub use sorting::{NullPosition, SortColumn, SortState, compare_cells};
