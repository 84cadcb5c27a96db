//! Cascade search executor.
//!
//! Submits the full query cascade as one multi-search round trip and merges
//! the per-layer responses into a single deduplicated result list.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::errors::PipelineError;
use product_search_repository::opensearch::cascade;
use product_search_repository::SearchEngineClient;
use product_search_shared::Product;

/// Executes the layered query cascade against the search engine.
pub struct SearchExecutor {
    engine: Arc<dyn SearchEngineClient>,
}

impl SearchExecutor {
    pub fn new(engine: Arc<dyn SearchEngineClient>) -> Self {
        Self { engine }
    }

    /// Run the cascade for `term` against `index` and merge the layers.
    ///
    /// Results keep layer order: every hit of an earlier layer precedes
    /// every hit of a later one, and within a layer the engine's ranking
    /// order is preserved. A document surfaced by more than one layer is
    /// kept only at its first appearance. A layer that errors is skipped;
    /// the remaining layers still contribute.
    ///
    /// `page_size` is applied per layer, so the merged list can hold up to
    /// four times that many results.
    #[instrument(skip(self), fields(index = %index, term = %term, page_size))]
    pub async fn execute(
        &self,
        index: &str,
        term: &str,
        page_size: usize,
    ) -> Result<Vec<Product>, PipelineError> {
        let layers = cascade::build_cascade(index, term, page_size);
        let lines = cascade::to_request_lines(layers);

        let response = self.engine.multi_search(lines).await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: Vec<Product> = Vec::new();

        for (position, layer) in response.responses.iter().enumerate() {
            let layer_number = position + 1;

            if let Some(details) = &layer.error {
                warn!(
                    layer = layer_number,
                    reason = %details.reason,
                    "Cascade layer failed; skipping its results"
                );
                continue;
            }

            for hit in &layer.hits.hits {
                let product: Product = match serde_json::from_value(hit.source.clone()) {
                    Ok(product) => product,
                    Err(e) => {
                        warn!(
                            layer = layer_number,
                            error = %e,
                            "Skipping hit with undeserializable source"
                        );
                        continue;
                    }
                };

                if product.id.is_empty() {
                    warn!(layer = layer_number, "Skipping hit without an id");
                    continue;
                }

                if seen.insert(product.id.clone()) {
                    merged.push(product);
                }
            }
        }

        info!(results = merged.len(), "Cascade search merged");
        Ok(merged)
    }
}
