//! Infrastructure layer - external adapters (configuration files, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod files;

pub use config::{config_file_path, ensure_config_exists, load_config};
pub use files::{read_draft_file, read_schema_names, write_export};
