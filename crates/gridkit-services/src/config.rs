use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Backend connection settings.
///
/// Built once at startup and passed to whatever performs backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheme and host of the backend, e.g. `https://erp.example.com`
    pub base_url: String,
    /// Path of the generic exec endpoint
    pub exec_path: String,
    /// Named backend data source the statement runs against
    pub backend_point: String,
    pub user_name: String,
    /// Session state names the backend restores before executing
    pub restore: Vec<String>,
    pub timeout_secs: u64,
    /// Quote-escape statements once more before sending them
    pub embed_quoted: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            exec_path: "/api/exec".to_string(),
            backend_point: "default".to_string(),
            user_name: String::new(),
            restore: Vec::new(),
            timeout_secs: 30,
            embed_quoted: true,
        }
    }
}

impl BackendConfig {
    pub fn config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .context("Could not determine config directory")
            .map(|p| p.join("gridkit").join("backend.json"))
    }

    /// Load from the default location; a missing file gives the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No backend config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read backend config from {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse backend config {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write backend config to {:?}", path))?;
        tracing::debug!("Saved backend config to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ServiceError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.backend_point.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "backend_point must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ServiceError::InvalidConfig(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL of the exec endpoint
    pub fn exec_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.exec_path.trim_start_matches('/')
        )
    }
}
