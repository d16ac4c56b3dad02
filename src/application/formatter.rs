//! Console formatting for catalogs, schemas and draft summaries.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{classify_schema, ConfigurationDraft, FeatureCatalog, SchemaKind};

/// Formats a table listing of the known features.
pub fn format_catalog_table(catalog: &FeatureCatalog) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Feature", "Root", "Defaults", "Description"]);

    for feature in catalog.iter() {
        let keys = feature.default_keys();
        let defaults = if keys.is_empty() {
            feature.defaults.to_string()
        } else {
            keys.join(", ")
        };

        table.add_row(vec![
            feature.id.as_str(),
            &feature.root.to_string(),
            &truncate(&defaults, 40),
            &truncate(&feature.description, 50),
        ]);
    }

    table.to_string()
}

/// Formats a classification table of schema names.
pub fn format_schema_table<S: AsRef<str>>(names: &[S]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Schema", "Kind"]);

    for name in names {
        let name = name.as_ref();
        table.add_row(vec![name.to_string(), classify_schema(name).to_string()]);
    }

    table.to_string()
}

/// Formats a short summary of a draft for display next to an export.
pub fn format_draft_summary(draft: &ConfigurationDraft) -> String {
    let meta = draft.metadata();
    let features = if draft.features().is_empty() {
        "-".to_string()
    } else {
        draft
            .features()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{}\n  Cache: {}\n  Template: {}\n  Container: {}\n  Features: {}\n  Top-level settings: {}",
        "🧩 Draft".bold(),
        meta.cache_name.as_deref().unwrap_or("-").cyan(),
        meta.template.as_deref().unwrap_or("-"),
        meta.container.as_deref().unwrap_or("-"),
        features.green(),
        draft.settings().len().to_string().yellow()
    )
}

/// Colors a schema name by its classification.
pub fn colorize_schema(name: &str) -> String {
    match classify_schema(name) {
        SchemaKind::User => name.green().to_string(),
        SchemaKind::Reserved => name.dimmed().to_string(),
    }
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DraftMetadata, FeatureDefinition};
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("first\nsecond", 20), "first");
    }

    #[test]
    fn test_catalog_table_lists_features() {
        let catalog = FeatureCatalog::new(vec![
            FeatureDefinition::new("indexing", json!({"enabled": true, "storage": "filesystem"}))
                .unwrap()
                .with_description("Query indexes"),
        ])
        .unwrap();

        let table = format_catalog_table(&catalog);
        assert!(table.contains("indexing"));
        assert!(table.contains("enabled, storage"));
        assert!(table.contains("Query indexes"));
    }

    #[test]
    fn test_schema_table_classifies() {
        let table = format_schema_table(&["google.protobuf.Any", "shop.Order"]);
        assert!(table.contains("reserved"));
        assert!(table.contains("user"));
    }

    #[test]
    fn test_draft_summary_mentions_features() {
        colored::control::set_override(false);
        let draft = ConfigurationDraft::new().with_metadata(DraftMetadata {
            cache_name: Some("orders".to_string()),
            ..Default::default()
        });
        let summary = format_draft_summary(&draft);
        assert!(summary.contains("Cache: orders"));
        assert!(summary.contains("Features: -"));
    }
}
