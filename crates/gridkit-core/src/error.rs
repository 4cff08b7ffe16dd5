//! Error types for gridkit

use thiserror::Error;

/// Core error type for grid operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column is not editable: {0}")]
    ColumnNotEditable(String),

    #[error("Row not found: {0}")]
    RowNotFound(String),

    #[error("Duplicate row key: {0}")]
    DuplicateRowKey(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
