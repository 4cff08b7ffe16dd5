//! Service layer for gridkit
//!
//! Sits between the grid/query crates and the outside world:
//!
//! - [`BackendConfig`] - Explicit backend settings, loaded once at startup
//! - [`BackendClient`] - Sends assembled statements to the generic exec endpoint
//! - [`export`] - CSV and XLSX export of the visible columns
//!
//! The grid itself never awaits anything; callers fetch rows here and hand
//! them to a `GridModel`.

mod backend;
mod config;
mod error;
pub mod export;

pub use backend::{BackendClient, ExecRequest, ExecResponse, HttpTransport, QueryTransport};
pub use config::BackendConfig;
pub use error::{ServiceError, ServiceResult};
