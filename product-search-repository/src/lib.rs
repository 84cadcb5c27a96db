//! # Product Search Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine. It includes the error taxonomy for engine operations, the
//! swappable `SearchEngineClient` interface, the layered query cascade
//! builder, and a concrete implementation for OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::EngineConfig;
pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::OpenSearchEngineClient;
