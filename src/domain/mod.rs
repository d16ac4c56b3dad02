//! Domain layer - core types of the configuration pipeline.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (filesystem, console, etc.).

pub mod config;
pub mod draft;
pub mod error;
pub mod feature;
pub mod format;
pub mod schema;

pub use config::{AppConfig, ExportConfig};
pub use draft::{
    is_element_name, ConfigurationDraft, DraftMetadata, SettingAssignment, SettingPath,
};
pub use error::{AppError, Result};
pub use feature::{FeatureCatalog, FeatureDefinition};
pub use format::{to_display_language, ExportFormat, LanguageTag};
pub use schema::{classify_schema, filter_schemas, SchemaKind};
