use gridkit_core::GridError;
use thiserror::Error;

/// Errors from query assembly
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;
