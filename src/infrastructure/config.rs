//! Configuration file management.
//!
//! Handles loading and creating TOML configuration files. The built-in
//! features catalog lives in [`DEFAULT_CONFIG`] so that a fresh install and
//! a freshly written config file describe the same features.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{is_element_name, AppConfig, AppError, Result};

/// Default configuration file content.
pub const DEFAULT_CONFIG: &str = r#"# Cache Config Configuration
# Auto-generated - edit as needed

[export]
# Format used when --format is not given: json, yaml, xml (anything else = plain text)
default_format = "yaml"

# One indentation level of pretty-printed XML
indent_unit = "\t"

# Root element of XML exports
root_element = "cache"

[paths]
# Custom data directory (optional, defaults to ~/.cache-config)
# data_dir = "/custom/path"

# Known features. Each feature owns the settings under `root`
# (defaults to the id); roots must not overlap.

[[features]]
id = "bounded"
root = "memory"
description = "Evict entries once the cache reaches a size limit"
[features.defaults]
storage = "HEAP"
max-count = 1000
when-full = "REMOVE"

[[features]]
id = "indexing"
description = "Index values so they can be queried"
[features.defaults]
enabled = true
storage = "filesystem"
startup-mode = "NONE"

[[features]]
id = "transactions"
root = "transaction"
description = "Run cache operations inside transactions"
[features.defaults]
mode = "NON_XA"
locking = "OPTIMISTIC"

[[features]]
id = "security"
description = "Require role-based authorization"
[features.defaults.authorization]
enabled = true

[[features]]
id = "persistence"
description = "Write entries through to a persistent store"
[features.defaults]
passivation = false
connection-attempts = 10

[[features]]
id = "backups"
description = "Replicate the cache to backup sites"
[features.defaults]
merge-policy = "DEFAULT"
max-cleanup-delay = 30000
tombstone-map-size = 512000
"#;

/// Parse the built-in configuration.
///
/// # Errors
/// Returns error if the built-in configuration does not parse.
pub fn default_config() -> Result<AppConfig> {
    parse_config(DEFAULT_CONFIG)
}

/// Load configuration from `path`, the default location, or the built-in
/// defaults, in that order.
///
/// # Errors
/// Returns error if a file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_config_from_file(path);
    }

    let config_path = config_file_path();
    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!("No configuration file, using built-in defaults");
        default_config()
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    tracing::debug!(path = %path.display(), "Loaded configuration");
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })?;

    if !is_element_name(&config.export.root_element) {
        return Err(AppError::Config {
            message: format!(
                "root_element '{}' is not a valid element name",
                config.export.root_element
            ),
        });
    }

    Ok(config)
}

/// Create the default configuration file at `path` if it doesn't exist.
///
/// Returns true when a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExportFormat;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config = default_config().unwrap();
        assert_eq!(config.export.default_format, ExportFormat::Yaml);
        assert_eq!(config.export.indent_unit, "\t");

        let catalog = config.catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            ["bounded", "indexing", "transactions", "security", "persistence", "backups"]
        );
    }

    #[test]
    fn test_default_feature_trees() {
        let catalog = default_config().unwrap().catalog().unwrap();

        let transactions = catalog.get("transactions").unwrap();
        assert_eq!(transactions.root.to_string(), "transaction");

        let security = catalog.get("security").unwrap();
        assert_eq!(security.defaults, json!({"authorization": {"enabled": true}}));

        // Key order follows the file.
        let bounded = catalog.get("bounded").unwrap();
        assert_eq!(bounded.default_keys(), ["storage", "max-count", "when-full"]);
    }

    #[test]
    fn test_written_default_loads() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let config = default_config().unwrap();
        assert!(ensure_config_exists(&config_path).unwrap());

        let loaded = load_config(Some(&config_path)).unwrap();
        assert_eq!(loaded.export.root_element, config.export.root_element);
        assert_eq!(loaded.features.len(), config.features.len());
    }

    #[test]
    fn test_ensure_config_exists_writes_once() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(ensure_config_exists(&config_path).unwrap());
        assert!(!ensure_config_exists(&config_path).unwrap());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn test_root_element_must_be_element_name() {
        let result = parse_config("[export]\nroot_element = \"my cache\"\n");
        assert!(matches!(result, Err(AppError::Config { .. })));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[export\n").unwrap();

        assert!(matches!(
            load_config_from_file(&config_path),
            Err(AppError::Config { .. })
        ));
    }
}
