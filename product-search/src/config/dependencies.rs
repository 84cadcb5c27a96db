//! Dependency initialization and wiring for the product search service.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::AppError;
use product_search_pipeline::{
    loader::LoaderConfig,
    orchestrator::Orchestrator,
    provisioner::ProvisionerConfig,
};
use product_search_repository::{EngineConfig, OpenSearchEngineClient, SearchEngineClient};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default target index name.
const DEFAULT_INDEX_NAME: &str = "products";

/// Default catalog source file.
const DEFAULT_SOURCE_PATH: &str = "data.csv";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Target index name.
    pub index_name: String,
    /// Catalog source file to ingest.
    pub source_path: PathBuf,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME`: basic-auth username (default: none)
    /// - `OPENSEARCH_PASSWORD`: basic-auth password (default: none)
    /// - `REQUEST_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)
    /// - `INDEX_NAME`: target index name (default: products)
    /// - `SOURCE_PATH`: catalog CSV to ingest (default: data.csv)
    /// - `INDEX_SETTINGS_PATH`: index settings artifact (default: config/index-settings.json)
    /// - `INDEX_MAPPINGS_PATH`: index mappings artifact (default: config/index-mappings.json)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If initialization fails
    pub async fn new() -> Result<Self, AppError> {
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let index_name = env::var("INDEX_NAME").unwrap_or_else(|_| DEFAULT_INDEX_NAME.to_string());
        let source_path = PathBuf::from(
            env::var("SOURCE_PATH").unwrap_or_else(|_| DEFAULT_SOURCE_PATH.to_string()),
        );

        info!(
            opensearch_url = %opensearch_url,
            index_name = %index_name,
            source_path = %source_path.display(),
            "Initializing dependencies"
        );

        let mut engine_config = EngineConfig::new(&opensearch_url);
        if let Ok(username) = env::var("OPENSEARCH_USERNAME") {
            engine_config.username = username;
        }
        if let Ok(password) = env::var("OPENSEARCH_PASSWORD") {
            engine_config.password = password;
        }
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT_SECS") {
            engine_config.request_timeout_secs = timeout.parse().map_err(|_| {
                AppError::config(format!("Invalid REQUEST_TIMEOUT_SECS value: {}", timeout))
            })?;
        } else {
            engine_config.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }

        // Initialize OpenSearch client
        let engine = OpenSearchEngineClient::new(&engine_config)
            .map_err(|e| AppError::config(format!("Failed to create OpenSearch client: {}", e)))?;
        let engine: Arc<dyn SearchEngineClient> = Arc::new(engine);

        // Verify OpenSearch is reachable
        let healthy = engine
            .health_check()
            .await
            .map_err(|e| AppError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(AppError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let mut provisioner_config = ProvisionerConfig::default();
        if let Ok(path) = env::var("INDEX_SETTINGS_PATH") {
            provisioner_config.settings_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("INDEX_MAPPINGS_PATH") {
            provisioner_config.mappings_path = PathBuf::from(path);
        }

        // Create orchestrator
        let orchestrator =
            Orchestrator::with_config(engine, provisioner_config, LoaderConfig::default());

        Ok(Self {
            orchestrator,
            index_name,
            source_path,
        })
    }
}
