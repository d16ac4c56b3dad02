//! Known features catalog.
//!
//! Every feature owns one settings sub-tree, addressed by its root path.
//! Roots never overlap, so enabling or disabling one feature cannot touch
//! another feature's settings.

use serde_json::Value;

use super::draft::{check_value_keys, SettingPath};
use super::error::{AppError, Result};

/// An optional capability block of a cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDefinition {
    /// Identifier used to toggle the feature (`indexing`, `security`, ...).
    pub id: String,
    /// Where the feature's settings live in the draft.
    pub root: SettingPath,
    /// Settings materialized when the feature is enabled.
    pub defaults: Value,
    /// Short human-readable description.
    pub description: String,
}

impl FeatureDefinition {
    /// Create a feature rooted at a top-level key equal to its id.
    ///
    /// # Errors
    /// Returns error if `id` is not a valid setting path.
    pub fn new(id: impl Into<String>, defaults: Value) -> Result<Self> {
        let id = id.into();
        let root = id.parse()?;
        Ok(Self {
            id,
            root,
            defaults,
            description: String::new(),
        })
    }

    #[must_use]
    pub fn with_root(mut self, root: SettingPath) -> Self {
        self.root = root;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Top-level keys of the default sub-tree, for listings.
    #[must_use]
    pub fn default_keys(&self) -> Vec<&str> {
        self.defaults
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// The set of features a draft may enable.
#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    features: Vec<FeatureDefinition>,
}

impl FeatureCatalog {
    /// Build a catalog, rejecting duplicate ids, overlapping roots and
    /// default keys that cannot be exported.
    ///
    /// # Errors
    /// Returns a configuration error naming the conflicting features.
    pub fn new(features: Vec<FeatureDefinition>) -> Result<Self> {
        for (i, a) in features.iter().enumerate() {
            check_value_keys(&a.defaults).map_err(|e| AppError::Config {
                message: format!("Feature '{}': {e}", a.id),
            })?;
            for b in &features[i + 1..] {
                if a.id == b.id {
                    return Err(AppError::Config {
                        message: format!("Feature '{}' is defined twice", a.id),
                    });
                }
                if a.root.overlaps(&b.root) {
                    return Err(AppError::Config {
                        message: format!(
                            "Features '{}' ({}) and '{}' ({}) have overlapping settings roots",
                            a.id, a.root, b.id, b.root
                        ),
                    });
                }
            }
        }

        Ok(Self { features })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FeatureDefinition> {
        self.features.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.features.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
