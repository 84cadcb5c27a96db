//! Configuration and wiring for the product search service.

pub mod dependencies;
pub mod telemetry;

pub use dependencies::Dependencies;
pub use telemetry::init_tracing;
