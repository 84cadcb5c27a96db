//! Error types for the product search pipeline.

use product_search_repository::SearchError;
use thiserror::Error;

/// Errors that can occur in the ingestion and search pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The catalog source file is missing.
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// The catalog source file could not be read at all. Individual bad
    /// rows are skipped and logged, never surfaced through this variant.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Index provisioning failed: a required artifact is missing or the
    /// engine rejected index creation.
    #[error("Provisioning error: {0}")]
    ProvisioningError(String),

    /// The bulk load failed. Batches written before the failure remain in
    /// the index.
    #[error("Load error: {0}")]
    LoadError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl PipelineError {
    /// Create a source-not-found error.
    pub fn source_not_found(msg: impl Into<String>) -> Self {
        Self::SourceNotFound(msg.into())
    }

    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a provisioning error.
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::ProvisioningError(msg.into())
    }

    /// Create a load error.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::LoadError(msg.into())
    }
}
