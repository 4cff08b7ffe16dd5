//! gridkit Core - Shared data model for tabular grids
//!
//! This crate provides the fundamental types that all other gridkit crates
//! depend on:
//!
//! - `CellValue` / `Row` - Open-ended records keyed by column
//! - `ColumnDefinition` - Column metadata (label, editability, filter type)
//! - `parse_float` - Lenient numeric parsing used by numeric filters
//! - `GridError` - Core error type

mod column;
mod error;
mod number;
mod types;

pub use column::*;
pub use error::*;
pub use number::*;
pub use types::*;
