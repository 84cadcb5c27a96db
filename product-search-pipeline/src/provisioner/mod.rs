//! Index provisioner for the ingestion pipeline.
//!
//! Ensures the target index exists before any write, creating it from the
//! externally supplied settings and mappings documents exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use product_search_repository::SearchEngineClient;

/// Locations of the provisioning artifacts.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// Path of the index settings JSON document.
    pub settings_path: PathBuf,
    /// Path of the index field mappings JSON document.
    pub mappings_path: PathBuf,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("config/index-settings.json"),
            mappings_path: PathBuf::from("config/index-mappings.json"),
        }
    }
}

/// Provisioner that creates the target index on demand.
///
/// Both artifact documents are required; there is no fallback to a bare
/// index. An engine rejection is surfaced with the engine's diagnostic
/// and no retry.
pub struct IndexProvisioner {
    engine: Arc<dyn SearchEngineClient>,
    config: ProvisionerConfig,
}

impl IndexProvisioner {
    /// Create a provisioner with the default artifact locations.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            engine,
            config: ProvisionerConfig::default(),
        }
    }

    /// Create a provisioner with custom artifact locations.
    pub fn with_config(engine: Arc<dyn SearchEngineClient>, config: ProvisionerConfig) -> Self {
        Self { engine, config }
    }

    /// Ensure the named index exists.
    ///
    /// If the index already exists this is a no-op. Otherwise the settings
    /// and mappings documents are read and the index created from them; a
    /// missing document fails with an error naming the missing artifact.
    #[instrument(skip(self))]
    pub async fn ensure(&self, index: &str) -> Result<(), PipelineError> {
        if self.engine.index_exists(index).await? {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        info!(index = %index, "Index does not exist; creating from settings and mappings documents");

        let settings = read_artifact(&self.config.settings_path, "settings")?;
        let mappings = read_artifact(&self.config.mappings_path, "mappings")?;

        self.engine
            .create_index(index, &settings, &mappings)
            .await
            .map_err(|e| PipelineError::provisioning(e.to_string()))
    }
}

/// Read one provisioning artifact, failing with its name when absent.
fn read_artifact(path: &Path, kind: &str) -> Result<Value, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::provisioning(format!(
            "Missing {} document at {}",
            kind,
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::provisioning(format!(
            "Failed to read {} document at {}: {}",
            kind,
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        PipelineError::provisioning(format!(
            "Invalid {} document at {}: {}",
            kind,
            path.display(),
            e
        ))
    })
}
