//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend, plus the layered cascade builder that
//! produces its multi-search submissions.

pub mod cascade;
mod client;

pub use client::OpenSearchEngineClient;
