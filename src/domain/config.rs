//! Application configuration model.
//!
//! Holds export preferences and the known features catalog as read from
//! the TOML configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::Result;
use super::feature::{FeatureCatalog, FeatureDefinition};
use super::format::ExportFormat;

/// Export preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    #[serde(default)]
    pub default_format: ExportFormat,

    /// One indentation unit of pretty-printed markup.
    #[serde(default = "default_indent_unit")]
    pub indent_unit: String,

    /// Name of the markup root element.
    #[serde(default = "default_root_element")]
    pub root_element: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::default(),
            indent_unit: default_indent_unit(),
            root_element: default_root_element(),
        }
    }
}

fn default_indent_unit() -> String {
    "\t".to_string()
}

fn default_root_element() -> String {
    "cache".to_string()
}

/// One entry of the known features catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Feature identifier.
    pub id: String,

    /// Settings root path (defaults to the id).
    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Default settings sub-tree.
    #[serde(default = "empty_object")]
    pub defaults: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl FeatureConfig {
    /// Convert into a catalog entry.
    ///
    /// # Errors
    /// Returns error if the id or root is not a valid setting path.
    pub fn to_definition(&self) -> Result<FeatureDefinition> {
        let mut definition = FeatureDefinition::new(&self.id, self.defaults.clone())?
            .with_description(&self.description);
        if let Some(root) = &self.root {
            definition = definition.with_root(root.parse()?);
        }
        Ok(definition)
    }
}

/// Path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub export: ExportConfig,

    /// Known features, in listing order.
    #[serde(default)]
    pub features: Vec<FeatureConfig>,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Build the features catalog.
    ///
    /// # Errors
    /// Returns error on invalid paths, duplicate ids or overlapping roots.
    pub fn catalog(&self) -> Result<FeatureCatalog> {
        let definitions = self
            .features
            .iter()
            .map(FeatureConfig::to_definition)
            .collect::<Result<Vec<_>>>()?;
        FeatureCatalog::new(definitions)
    }

    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cache-config")
    }

    /// Get the exports directory path.
    #[must_use]
    pub fn exports_dir(&self) -> PathBuf {
        self.data_dir().join("exports")
    }
}
