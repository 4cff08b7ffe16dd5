use gridkit_query::QueryError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend rejected the query: {0}")]
    Rejected(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Query assembly failed: {0}")]
    Query(#[from] QueryError),

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::InvalidResponse(err.to_string())
        } else {
            ServiceError::RequestFailed(err.to_string())
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ServiceError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ServiceError::ExportFailed(err.to_string())
    }
}
