//! Owned store for the in-progress configuration.
//!
//! The store is the only write path for a draft: whole-value replacement
//! through [`ConfigurationStore::set_configuration`] and structural feature
//! toggles. Readers take snapshots through [`ConfigurationStore::draft`].

use crate::domain::{ConfigurationDraft, FeatureCatalog};

/// Holds the draft of one "create cache" flow.
#[derive(Debug, Clone)]
pub struct ConfigurationStore {
    catalog: FeatureCatalog,
    draft: ConfigurationDraft,
}

impl ConfigurationStore {
    /// Start a flow with an empty draft.
    #[must_use]
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self {
            catalog,
            draft: ConfigurationDraft::new(),
        }
    }

    /// Current snapshot of the draft.
    #[must_use]
    pub const fn draft(&self) -> &ConfigurationDraft {
        &self.draft
    }

    #[must_use]
    pub const fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Replace the whole draft.
    pub fn set_configuration(&mut self, draft: ConfigurationDraft) {
        tracing::debug!(
            keys = draft.settings().len(),
            features = draft.features().len(),
            "Configuration replaced"
        );
        self.draft = draft;
    }

    /// Enable a feature and materialize its default settings.
    ///
    /// Enabling an enabled feature does nothing. Unknown ids are ignored, and
    /// so is a feature whose root would sit under a plain value.
    pub fn add_feature(&mut self, feature_id: &str) {
        let Some(feature) = self.catalog.get(feature_id) else {
            tracing::warn!(feature = feature_id, "Ignoring unknown feature");
            return;
        };

        match self.draft.materialize_feature(feature) {
            Ok(true) => {
                tracing::info!(feature = feature_id, root = %feature.root, "Feature enabled");
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(feature = feature_id, error = %e, "Feature not enabled");
            }
        }
    }

    /// Disable a feature and delete its settings sub-tree.
    ///
    /// Disabling a disabled feature does nothing. Unknown ids are ignored.
    pub fn remove_feature(&mut self, feature_id: &str) {
        let Some(feature) = self.catalog.get(feature_id) else {
            tracing::warn!(feature = feature_id, "Ignoring unknown feature");
            return;
        };

        if self.draft.drop_feature(feature) {
            tracing::info!(feature = feature_id, root = %feature.root, "Feature disabled");
        }
    }

    /// Drop the draft, e.g. when the flow is cancelled.
    pub fn discard(&mut self) {
        self.draft = ConfigurationDraft::new();
    }
}
