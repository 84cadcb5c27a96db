//! Bulk loader for the ingestion pipeline.
//!
//! Writes parsed records into the target index in fixed-size batches with
//! per-document status validation and an at-most-once-load-per-index gate.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use product_search_repository::SearchEngineClient;
use product_search_shared::Product;

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of records per bulk write.
    pub batch_size: usize,
    /// Pause between consecutive batches (not after the last), in
    /// milliseconds.
    pub batch_delay_ms: u64,
    /// Settle time before the post-load verification count, in
    /// milliseconds.
    pub refresh_wait_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            batch_delay_ms: 100,
            refresh_wait_ms: 500,
        }
    }
}

/// Result of a completed load call.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    /// Number of records written by this call.
    pub indexed: usize,
    /// True when the idempotency gate found documents already present and
    /// nothing was written.
    pub already_loaded: bool,
}

/// Loader that writes product records into the search index.
///
/// A load is at-most-once per index: a non-empty index is treated as
/// already loaded and left untouched. Two concurrent loads against an
/// empty index can both pass that gate; callers are expected to run a
/// single writer per index.
pub struct BulkLoader {
    engine: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a loader with the default batching configuration.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            engine,
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom batching configuration.
    pub fn with_config(engine: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        Self { engine, config }
    }

    /// Load records into the named index.
    ///
    /// Records are written in input order in batches of
    /// `config.batch_size`, keyed by each record's own identifier. Any
    /// per-document status >= 400 fails the whole load; batches already
    /// written stay in place and later batches are not attempted.
    #[instrument(skip(self, products), fields(index = %index, records = products.len()))]
    pub async fn load(
        &self,
        index: &str,
        products: &[Product],
    ) -> Result<LoadSummary, PipelineError> {
        if products.is_empty() {
            warn!("No products to load");
            return Ok(LoadSummary {
                indexed: 0,
                already_loaded: false,
            });
        }

        if !self.engine.index_exists(index).await? {
            return Err(PipelineError::load(format!(
                "Index {} does not exist; cannot load products",
                index
            )));
        }

        let existing = self.engine.count_documents(index).await?;
        if existing > 0 {
            info!(
                index = %index,
                existing,
                "Index already contains documents; skipping load"
            );
            return Ok(LoadSummary {
                indexed: 0,
                already_loaded: true,
            });
        }

        let total_batches = products.len().div_ceil(self.config.batch_size);
        let mut indexed = 0usize;

        for (batch_index, batch) in products.chunks(self.config.batch_size).enumerate() {
            let batch_number = batch_index + 1;
            info!(
                batch = batch_number,
                total_batches,
                size = batch.len(),
                "Submitting batch"
            );

            let outcome = self.engine.bulk_write(index, batch).await?;

            if outcome.has_failures() {
                let mut failed = 0usize;
                for failure in outcome.failures() {
                    failed += 1;
                    error!(
                        id = %failure.id,
                        status = failure.status,
                        error = failure.error.as_deref().unwrap_or("no error details"),
                        "Document failed to index"
                    );
                }
                return Err(PipelineError::load(format!(
                    "Batch {} contained {} failed documents; load aborted",
                    batch_number, failed
                )));
            }

            indexed += batch.len();
            info!(
                batch = batch_number,
                total_batches,
                indexed,
                total = products.len(),
                "Batch completed"
            );

            if batch_number < total_batches {
                tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }
        }

        info!(indexed, "All batches written");

        // Best-effort verification once the engine has had time to refresh;
        // a mismatch is logged, never a failure.
        tokio::time::sleep(Duration::from_millis(self.config.refresh_wait_ms)).await;
        match self.engine.count_documents(index).await {
            Ok(count) if count as usize == indexed => {
                info!(index = %index, count, "Post-load verification count matches")
            }
            Ok(count) => warn!(
                index = %index,
                count,
                expected = indexed,
                "Post-load count differs from records written"
            ),
            Err(e) => warn!(error = %e, "Post-load verification count failed"),
        }

        Ok(LoadSummary {
            indexed,
            already_loaded: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use product_search_repository::types::{
        BulkItemStatus, BulkWriteOutcome, MultiSearchResponse,
    };
    use product_search_repository::SearchError;
    use serde_json::Value;
    use std::sync::Mutex;

    struct MockEngine {
        exists: bool,
        count: u64,
        /// 1-based batch number whose first document reports status 400.
        fail_batch: Option<usize>,
        batch_sizes: Mutex<Vec<usize>>,
    }

    impl MockEngine {
        fn new(exists: bool, count: u64) -> Self {
            Self {
                exists,
                count,
                fail_batch: None,
                batch_sizes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchEngineClient for MockEngine {
        async fn index_exists(&self, _index: &str) -> Result<bool, SearchError> {
            Ok(self.exists)
        }

        async fn create_index(
            &self,
            _index: &str,
            _settings: &Value,
            _mappings: &Value,
        ) -> Result<(), SearchError> {
            Ok(())
        }

        async fn count_documents(&self, _index: &str) -> Result<u64, SearchError> {
            Ok(self.count)
        }

        async fn bulk_write(
            &self,
            _index: &str,
            products: &[Product],
        ) -> Result<BulkWriteOutcome, SearchError> {
            let mut sizes = self.batch_sizes.lock().unwrap();
            sizes.push(products.len());
            let batch_number = sizes.len();

            let items = products
                .iter()
                .enumerate()
                .map(|(position, product)| {
                    let failing =
                        self.fail_batch == Some(batch_number) && position == 0;
                    BulkItemStatus {
                        id: product.id.clone(),
                        status: if failing { 400 } else { 201 },
                        error: failing.then(|| "mapper_parsing_exception".to_string()),
                    }
                })
                .collect();

            Ok(BulkWriteOutcome { items })
        }

        async fn multi_search(
            &self,
            _lines: Vec<Value>,
        ) -> Result<MultiSearchResponse, SearchError> {
            Ok(MultiSearchResponse { responses: vec![] })
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    fn quick_config() -> LoaderConfig {
        LoaderConfig {
            batch_size: 500,
            batch_delay_ms: 0,
            refresh_wait_ms: 0,
        }
    }

    fn make_products(count: usize) -> Vec<Product> {
        (0..count)
            .map(|i| Product {
                id: format!("p{}", i),
                title: format!("Product {}", i),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_idempotency_gate_skips_non_empty_index() {
        let engine = Arc::new(MockEngine::new(true, 42));
        let loader = BulkLoader::with_config(engine.clone(), quick_config());

        let summary = loader.load("products", &make_products(10)).await.unwrap();

        assert!(summary.already_loaded);
        assert_eq!(summary.indexed, 0);
        assert!(engine.batch_sizes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_splits_records_into_fixed_batches() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let loader = BulkLoader::with_config(engine.clone(), quick_config());

        let summary = loader.load("products", &make_products(1200)).await.unwrap();

        assert!(!summary.already_loaded);
        assert_eq!(summary.indexed, 1200);
        assert_eq!(*engine.batch_sizes.lock().unwrap(), vec![500, 500, 200]);
    }

    #[tokio::test]
    async fn test_failing_document_aborts_remaining_batches() {
        let mut engine = MockEngine::new(true, 0);
        engine.fail_batch = Some(2);
        let engine = Arc::new(engine);
        let loader = BulkLoader::with_config(engine.clone(), quick_config());

        let error = loader
            .load("products", &make_products(1200))
            .await
            .unwrap_err();

        assert!(matches!(error, PipelineError::LoadError(_)));
        assert!(error.to_string().contains("Batch 2"));
        // The first batch was written, the third never attempted.
        assert_eq!(*engine.batch_sizes.lock().unwrap(), vec![500, 500]);
    }

    #[tokio::test]
    async fn test_missing_index_fails_without_writing() {
        let engine = Arc::new(MockEngine::new(false, 0));
        let loader = BulkLoader::with_config(engine.clone(), quick_config());

        let error = loader.load("products", &make_products(5)).await.unwrap_err();

        assert!(matches!(error, PipelineError::LoadError(_)));
        assert!(engine.batch_sizes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_record_set_is_success() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let loader = BulkLoader::with_config(engine.clone(), quick_config());

        let summary = loader.load("products", &[]).await.unwrap();

        assert_eq!(summary.indexed, 0);
        assert!(!summary.already_loaded);
        assert!(engine.batch_sizes.lock().unwrap().is_empty());
    }
}
