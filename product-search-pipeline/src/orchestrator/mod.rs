//! Top-level pipeline orchestration.
//!
//! Wires the source parser, index provisioner, bulk loader and search
//! executor together behind the two operations callers actually need:
//! indexing a source file and searching the resulting index.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::executor::SearchExecutor;
use crate::loader::{BulkLoader, LoaderConfig};
use crate::provisioner::{IndexProvisioner, ProvisionerConfig};
use crate::source;
use product_search_repository::opensearch::cascade;
use product_search_repository::SearchEngineClient;
use product_search_shared::Product;

/// Outcome report of one ingestion run.
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Whether the run completed without a fatal error.
    pub success: bool,
    /// Fatal error description, set when `success` is false.
    pub error_message: Option<String>,
    /// Records parsed from the source file, when parsing happened.
    pub total_parsed: Option<usize>,
    /// Records written by this run. `None` when the index was already
    /// populated and nothing was written.
    pub total_indexed: Option<usize>,
    /// Non-fatal issues observed during the run.
    pub errors: Vec<String>,
}

impl IndexReport {
    fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error_message: Some(message.clone()),
            total_parsed: None,
            total_indexed: None,
            errors: vec![message],
        }
    }
}

/// Facade over the whole pipeline.
pub struct Orchestrator {
    engine: Arc<dyn SearchEngineClient>,
    provisioner: IndexProvisioner,
    loader: BulkLoader,
    executor: SearchExecutor,
}

impl Orchestrator {
    /// Build an orchestrator with default provisioner and loader settings.
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self::with_config(
            engine,
            ProvisionerConfig::default(),
            LoaderConfig::default(),
        )
    }

    /// Build an orchestrator with explicit provisioner and loader settings.
    pub fn with_config(
        engine: Arc<dyn SearchEngineClient>,
        provisioner_config: ProvisionerConfig,
        loader_config: LoaderConfig,
    ) -> Self {
        Self {
            provisioner: IndexProvisioner::with_config(engine.clone(), provisioner_config),
            loader: BulkLoader::with_config(engine.clone(), loader_config),
            executor: SearchExecutor::new(engine.clone()),
            engine,
        }
    }

    /// Parse `source_path` and load its records into `index`, provisioning
    /// the index first when it does not exist yet.
    ///
    /// All failure modes are folded into the returned report rather than an
    /// error, so callers get the parse and load counts that were reached.
    #[instrument(skip(self), fields(source = %source_path.display(), index = %index))]
    pub async fn index_from_source(&self, source_path: &Path, index: &str) -> IndexReport {
        if !source_path.exists() {
            let error = PipelineError::source_not_found(source_path.display().to_string());
            error!(error = %error, "Source file missing");
            return IndexReport::failure(error.to_string());
        }

        if let Err(e) = self.provisioner.ensure(index).await {
            error!(error = %e, "Index provisioning failed");
            return IndexReport::failure(e.to_string());
        }

        let products = match source::parse_products(source_path) {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Source parsing failed");
                return IndexReport::failure(e.to_string());
            }
        };
        let total_parsed = products.len();
        info!(total_parsed, "Source parsed");

        match self.loader.load(index, &products).await {
            Ok(summary) if summary.already_loaded => {
                info!("Index already populated; nothing written");
                IndexReport {
                    success: true,
                    error_message: None,
                    total_parsed: Some(total_parsed),
                    total_indexed: None,
                    errors: Vec::new(),
                }
            }
            Ok(summary) => IndexReport {
                success: true,
                error_message: None,
                total_parsed: Some(total_parsed),
                total_indexed: Some(summary.indexed),
                errors: Vec::new(),
            },
            Err(e) => {
                error!(error = %e, "Load failed");
                IndexReport {
                    success: false,
                    error_message: Some(e.to_string()),
                    total_parsed: Some(total_parsed),
                    total_indexed: None,
                    errors: vec![e.to_string()],
                }
            }
        }
    }

    /// Search `index` for `term`.
    ///
    /// A blank term short-circuits to an empty result without touching the
    /// engine. Out-of-range page sizes (zero, or above the per-layer cap)
    /// fall back to the default before the cascade is built.
    pub async fn search(
        &self,
        index: &str,
        term: &str,
        page_size: usize,
    ) -> Result<Vec<Product>, PipelineError> {
        if term.trim().is_empty() {
            warn!("Blank search term; returning no results");
            return Ok(Vec::new());
        }

        let page_size = cascade::coerce_page_size(page_size);
        self.executor.execute(index, term, page_size).await
    }

    /// Whether the search engine is reachable and reporting a usable
    /// cluster status.
    pub async fn engine_healthy(&self) -> bool {
        match self.engine.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Health check failed");
                false
            }
        }
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
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockEngine {
        exists: bool,
        count: u64,
        multi_search_calls: AtomicUsize,
        captured_lines: Mutex<Vec<Value>>,
        written: Mutex<Vec<Product>>,
    }

    impl MockEngine {
        fn new(exists: bool, count: u64) -> Self {
            Self {
                exists,
                count,
                multi_search_calls: AtomicUsize::new(0),
                captured_lines: Mutex::new(Vec::new()),
                written: Mutex::new(Vec::new()),
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
            self.written.lock().unwrap().extend_from_slice(products);
            let items = products
                .iter()
                .map(|product| BulkItemStatus {
                    id: product.id.clone(),
                    status: 201,
                    error: None,
                })
                .collect();
            Ok(BulkWriteOutcome { items })
        }

        async fn multi_search(
            &self,
            lines: Vec<Value>,
        ) -> Result<MultiSearchResponse, SearchError> {
            self.multi_search_calls.fetch_add(1, Ordering::SeqCst);
            *self.captured_lines.lock().unwrap() = lines;
            Ok(MultiSearchResponse { responses: vec![] })
        }

        async fn health_check(&self) -> Result<bool, SearchError> {
            Ok(true)
        }
    }

    fn quick_loader_config() -> LoaderConfig {
        LoaderConfig {
            batch_size: 500,
            batch_delay_ms: 0,
            refresh_wait_ms: 0,
        }
    }

    fn orchestrator_for(engine: Arc<MockEngine>) -> Orchestrator {
        Orchestrator::with_config(
            engine,
            ProvisionerConfig::default(),
            quick_loader_config(),
        )
    }

    fn write_source_csv(dir: &tempfile::TempDir, rows: usize) -> std::path::PathBuf {
        let path = dir.path().join("products.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "id,title,brand,description,availability,reviews_count,categories,rank,rating"
        )
        .unwrap();
        for i in 0..rows {
            writeln!(
                file,
                "p{i},Product {i},Acme,Desc,In Stock,3,\"[\"\"Beauty\"\"]\",{i},4.5"
            )
            .unwrap();
        }
        path
    }

    #[tokio::test]
    async fn test_blank_term_skips_engine() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let orchestrator = orchestrator_for(engine.clone());

        let results = orchestrator.search("products", "   ", 20).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(engine.multi_search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_page_size_falls_back_to_default() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let orchestrator = orchestrator_for(engine.clone());

        orchestrator.search("products", "soap", 250).await.unwrap();

        let lines = engine.captured_lines.lock().unwrap();
        for body in lines.iter().skip(1).step_by(2) {
            assert_eq!(body["size"], 20);
        }
    }

    #[tokio::test]
    async fn test_in_range_page_size_passes_through() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let orchestrator = orchestrator_for(engine.clone());

        orchestrator.search("products", "soap", 7).await.unwrap();

        let lines = engine.captured_lines.lock().unwrap();
        assert_eq!(lines.len(), 8);
        for body in lines.iter().skip(1).step_by(2) {
            assert_eq!(body["size"], 7);
        }
    }

    #[tokio::test]
    async fn test_missing_source_file_reports_failure() {
        let engine = Arc::new(MockEngine::new(true, 0));
        let orchestrator = orchestrator_for(engine);

        let report = orchestrator
            .index_from_source(Path::new("/nonexistent/products.csv"), "products")
            .await;

        assert!(!report.success);
        assert!(report.error_message.unwrap().contains("not found"));
        assert!(report.total_parsed.is_none());
    }

    #[tokio::test]
    async fn test_indexing_happy_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source_csv(&dir, 3);
        let engine = Arc::new(MockEngine::new(true, 0));
        let orchestrator = orchestrator_for(engine.clone());

        let report = orchestrator.index_from_source(&path, "products").await;

        assert!(report.success);
        assert_eq!(report.total_parsed, Some(3));
        assert_eq!(report.total_indexed, Some(3));
        assert!(report.errors.is_empty());
        assert_eq!(engine.written.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_already_populated_index_reports_no_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source_csv(&dir, 3);
        let engine = Arc::new(MockEngine::new(true, 99));
        let orchestrator = orchestrator_for(engine.clone());

        let report = orchestrator.index_from_source(&path, "products").await;

        assert!(report.success);
        assert_eq!(report.total_parsed, Some(3));
        assert!(report.total_indexed.is_none());
        assert!(engine.written.lock().unwrap().is_empty());
    }
}
