//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, CountParts, MsearchParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::config::EngineConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::{BulkItemStatus, BulkWriteOutcome, MultiSearchResponse};
use product_search_shared::Product;

/// OpenSearch-backed implementation of [`SearchEngineClient`].
///
/// The connection is long-lived and thread safe; the request timeout and
/// credentials from [`EngineConfig`] are applied once at construction and
/// hold for every call.
pub struct OpenSearchEngineClient {
    client: OpenSearch,
}

impl OpenSearchEngineClient {
    /// Create a new client from the given engine configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine URL, optional credentials, and request timeout
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchEngineClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(config: &EngineConfig) -> Result<Self, SearchError> {
        let url = Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(Duration::from_secs(config.request_timeout_secs));

        if config.has_credentials() {
            builder = builder.auth(Credentials::Basic(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            timeout_secs = config.request_timeout_secs,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Extract per-document statuses from a bulk response body.
    fn parse_bulk_items(body: &Value) -> Vec<BulkItemStatus> {
        body.get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        let entry = item.get("index").unwrap_or(&Value::Null);
                        BulkItemStatus {
                            id: entry
                                .get("_id")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                            status: entry
                                .get("status")
                                .and_then(Value::as_u64)
                                .unwrap_or_default() as u16,
                            error: entry
                                .get("error")
                                .filter(|e| !e.is_null())
                                .map(Value::to_string),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchEngineClient {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn create_index(
        &self,
        index: &str,
        settings: &Value,
        mappings: &Value,
    ) -> Result<(), SearchError> {
        let body = json!({
            "settings": settings,
            "mappings": mappings
        });

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Index creation rejected");
            return Err(SearchError::index_creation(error_body));
        }

        info!(index = %index, "Created index with supplied settings and mappings");
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::count(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::count(format!(
                "Count failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchError::parse("Count response missing count field"))
    }

    async fn bulk_write(
        &self,
        index: &str,
        products: &[Product],
    ) -> Result<BulkWriteOutcome, SearchError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(products.len() * 2);
        for product in products {
            body.push(json!({ "index": { "_id": product.id } }).into());
            body.push(
                serde_json::to_value(product)
                    .map_err(|e| SearchError::serialization(e.to_string()))?
                    .into(),
            );
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_write(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index = %index, status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_write(format!(
                "Bulk write failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let items = Self::parse_bulk_items(&response_body);
        debug!(index = %index, items = items.len(), "Bulk write accepted");

        Ok(BulkWriteOutcome { items })
    }

    async fn multi_search(&self, lines: Vec<Value>) -> Result<MultiSearchResponse, SearchError> {
        let body: Vec<JsonBody<Value>> = lines.into_iter().map(Into::into).collect();

        let response = self
            .client
            .msearch(MsearchParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::execution(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Multi-search failed");
            return Err(SearchError::execution(format!(
                "Multi-search failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<MultiSearchResponse>()
            .await
            .map_err(|e| SearchError::execution(format!("Failed to parse multi-search response: {}", e)))
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(opensearch::cluster::ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(status = %status, "Cluster health");

        Ok(status == "green" || status == "yellow")
    }
}
