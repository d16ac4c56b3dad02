//! Application layer - use cases and orchestration.
//!
//! This layer holds the configuration store, the multi-format exporter
//! and console formatting.

pub mod exporter;
pub mod formatter;
pub mod pretty;
pub mod store;

pub use exporter::{render, Exporter};
pub use formatter::{
    colorize_schema, format_catalog_table, format_draft_summary, format_schema_table,
};
pub use store::ConfigurationStore;
