//! File input and output for drafts, exports and schema lists.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::domain::{AppError, ConfigurationDraft, Result};

/// Read a draft saved as JSON.
///
/// # Errors
/// Returns error if the file cannot be read, is not a valid draft, or has
/// settings keys that cannot be exported as markup.
pub fn read_draft_file(path: &Path) -> Result<ConfigurationDraft> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read draft file: {}", path.display()), e))?;

    let draft: ConfigurationDraft = serde_json::from_str(&content).map_err(AppError::json_parse)?;
    draft.check_keys()?;
    tracing::debug!(
        path = %path.display(),
        keys = draft.settings().len(),
        features = draft.features().len(),
        "Loaded draft"
    );
    Ok(draft)
}

/// Write exported content, creating parent directories.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }

    let mut file = fs::File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create {}", path.display()), e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| AppError::io("Failed to write file", e))?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Export written");
    Ok(())
}

/// Read schema names, one per line, from `path` or stdin.
///
/// Blank lines and `#` comments are skipped.
///
/// # Errors
/// Returns error if the input cannot be read.
pub fn read_schema_names(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            let file = fs::File::open(path).map_err(|e| {
                AppError::io(format!("Failed to open schema list: {}", path.display()), e)
            })?;
            collect_names(std::io::BufReader::new(file))
        }
        None => collect_names(std::io::stdin().lock()),
    }
}

fn collect_names(reader: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| AppError::io("Failed to read schema list", e))?;
        let name = line.trim();
        if !name.is_empty() && !name.starts_with('#') {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
