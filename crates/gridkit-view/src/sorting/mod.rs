//! Sorting module for grids
//!
//! Provides stable multi-column sorting with configurable null handling.

mod multi_sort;

pub use multi_sort::{NullPosition, SortColumn, SortState, compare_cells};
