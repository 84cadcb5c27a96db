//! # Product Search Pipeline
//!
//! This crate provides the pipeline components for loading a product
//! catalog into the search engine and querying it through the layered
//! cascade.
//!
//! ## Architecture
//!
//! 1. **Source**: Parses product records from the catalog file
//! 2. **Provisioner**: Ensures the target index exists before any write
//! 3. **Loader**: Writes records into the index in validated batches
//! 4. **Executor**: Runs the query cascade and merges layer results
//! 5. **Orchestrator**: Sequences the components and exposes the two
//!    boundary operations

pub mod errors;
pub mod executor;
pub mod loader;
pub mod orchestrator;
pub mod provisioner;
pub mod source;

pub use errors::PipelineError;
pub use orchestrator::{IndexReport, Orchestrator};
