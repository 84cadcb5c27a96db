//! Entry point for the product search service.
//!
//! Initializes tracing and dependencies, then ingests the configured
//! catalog file into the target index.

use tracing::{error, info};

use product_search::{AppError, Dependencies};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    product_search::config::init_tracing();

    info!("Starting product search service");

    let deps = Dependencies::new().await?;

    let report = deps
        .orchestrator
        .index_from_source(&deps.source_path, &deps.index_name)
        .await;

    if !report.success {
        error!(
            error = report.error_message.as_deref().unwrap_or("unknown"),
            "Catalog ingestion failed"
        );
        return Err(AppError::config(
            report
                .error_message
                .unwrap_or_else(|| "Catalog ingestion failed".to_string()),
        ));
    }

    info!(
        parsed = ?report.total_parsed,
        indexed = ?report.total_indexed,
        "Catalog ingestion complete"
    );

    Ok(())
}
