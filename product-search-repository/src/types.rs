//! Request and response types for search engine operations.

use serde::Deserialize;
use serde_json::Value;

/// Outcome of one document within a bulk write.
///
/// Carries the per-document HTTP status the engine reported so callers can
/// distinguish genuine failures (status >= 400) from success variants such
/// as 200 Updated and 201 Created.
#[derive(Debug, Clone)]
pub struct BulkItemStatus {
    /// The document identifier the write was keyed by.
    pub id: String,
    /// Per-document status code from the bulk response.
    pub status: u16,
    /// Engine error details, present when the item failed.
    pub error: Option<String>,
}

impl BulkItemStatus {
    /// Whether the engine reported this item as failed.
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

/// Outcome of a whole bulk write request.
#[derive(Debug, Clone, Default)]
pub struct BulkWriteOutcome {
    /// Per-document statuses in submission order.
    pub items: Vec<BulkItemStatus>,
}

impl BulkWriteOutcome {
    /// Iterate over the items the engine reported as failed.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemStatus> {
        self.items.iter().filter(|item| item.is_failure())
    }

    /// Whether any item in the batch failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Envelope of a multi-search response: one sub-response per submitted
/// query, in submission order.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSearchResponse {
    #[serde(default)]
    pub responses: Vec<LayerResponse>,
}

/// One sub-response of a multi-search call. Each layer independently
/// either errors or carries hits.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerResponse {
    /// Engine-reported error for this layer only.
    #[serde(default)]
    pub error: Option<LayerErrorDetails>,
    #[serde(default)]
    pub hits: HitsEnvelope,
}

/// Error details of a failed layer.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerErrorDetails {
    #[serde(default)]
    pub reason: String,
}

/// The `hits` object of one sub-response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// One hit of one layer, with its raw document source.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_source", default)]
    pub source: Value,
}
