//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch,
//! Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkWriteOutcome, MultiSearchResponse};
use product_search_shared::Product;

/// Abstract interface for search engine operations.
///
/// This trait defines all the operations the ingestion pipeline and the
/// search executor need from the engine. Implementations can be swapped for
/// different backends (OpenSearch, mock, etc.) enabling easy testing.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async
/// tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>` for consistent error
/// handling.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Check whether the named index exists.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If the index does not exist
    /// * `Err(SearchError)` - If the existence check fails
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Create the named index from externally supplied settings and
    /// mappings documents.
    ///
    /// The engine's rejection diagnostic is surfaced verbatim; no retry is
    /// attempted and no bare index is created as a fallback.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `settings` - The index settings JSON document
    /// * `mappings` - The index field mappings JSON document
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchError::IndexCreationError)` - If the engine rejected
    ///   the request
    async fn create_index(
        &self,
        index: &str,
        settings: &Value,
        mappings: &Value,
    ) -> Result<(), SearchError>;

    /// Count the documents currently held by the named index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(count)` - The number of documents in the index
    /// * `Err(SearchError)` - If the count fails
    async fn count_documents(&self, index: &str) -> Result<u64, SearchError>;

    /// Write a batch of products in a single bulk request, keyed by each
    /// product's own identifier (repeated identifiers overwrite rather
    /// than duplicate).
    ///
    /// A transport-level failure is an `Err`; per-document failures inside
    /// an accepted response are reported through the returned outcome so
    /// the caller can validate per-document status codes.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index
    /// * `products` - The batch of products to write
    ///
    /// # Returns
    ///
    /// * `Ok(BulkWriteOutcome)` - Per-document statuses in submission order
    /// * `Err(SearchError::BulkWriteError)` - If the bulk call itself fails
    async fn bulk_write(
        &self,
        index: &str,
        products: &[Product],
    ) -> Result<BulkWriteOutcome, SearchError>;

    /// Submit a newline-delimited multi-query request.
    ///
    /// `lines` alternates header objects (`{"index": <name>}`) and complete
    /// query bodies, one pair per query. The response carries one
    /// sub-response per pair, in submission order; individual
    /// sub-responses may report their own errors without failing the call.
    ///
    /// # Arguments
    ///
    /// * `lines` - The interleaved header/body lines
    ///
    /// # Returns
    ///
    /// * `Ok(MultiSearchResponse)` - One sub-response per submitted query
    /// * `Err(SearchError::ExecutionError)` - If the whole call fails
    async fn multi_search(&self, lines: Vec<Value>) -> Result<MultiSearchResponse, SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
