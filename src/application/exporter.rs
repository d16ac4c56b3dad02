//! Multi-format export of configuration drafts.
//!
//! Supports JSON, YAML and markup output. All three describe the same tree:
//! keys keep their insertion order and null values are kept, never dropped.

use serde_json::{Map, Value};

use crate::domain::{
    to_display_language, AppError, ConfigurationDraft, ExportConfig, ExportFormat, LanguageTag,
    Result,
};

use super::pretty::format_markup;

/// Renders drafts into text.
#[derive(Debug, Clone)]
pub struct Exporter {
    indent_unit: String,
    root_element: String,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(&ExportConfig::default())
    }
}

/// A rendered draft plus what a viewer or download needs to show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPreview {
    pub format: ExportFormat,
    pub language: LanguageTag,
    pub content: String,
    /// Suggested download file name.
    pub file_name: String,
}

impl Exporter {
    #[must_use]
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            indent_unit: config.indent_unit.clone(),
            root_element: config.root_element.clone(),
        }
    }

    /// Render the draft's settings tree in `format`.
    ///
    /// An empty draft renders as `{}` (JSON, YAML) or a single
    /// self-terminating root element (markup).
    ///
    /// # Errors
    /// Returns error if the underlying serializer fails.
    pub fn render(&self, draft: &ConfigurationDraft, format: ExportFormat) -> Result<String> {
        let settings = draft.settings();
        tracing::debug!(%format, keys = settings.len(), "Rendering draft");

        match format {
            ExportFormat::Json => serde_json::to_string(settings).map_err(AppError::serialize),
            ExportFormat::Yaml => serde_yaml_ng::to_string(settings).map_err(AppError::serialize),
            ExportFormat::Xml | ExportFormat::PlainText => {
                let flat = self.lower_to_markup(settings);
                Ok(format_markup(&flat, &self.indent_unit))
            }
        }
    }

    /// Render and package the result for a viewer or download.
    ///
    /// # Errors
    /// Returns error if rendering fails.
    pub fn preview(&self, draft: &ConfigurationDraft, format: ExportFormat) -> Result<ExportPreview> {
        let content = self.render(draft, format)?;
        let stem = draft
            .metadata()
            .cache_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.root_element);

        Ok(ExportPreview {
            format,
            language: to_display_language(format),
            content,
            file_name: format!("{}.{}", sanitize_file_stem(stem), format.file_extension()),
        })
    }

    /// Lower the settings tree into flat, unindented markup.
    ///
    /// Keys are written as element names unchanged; drafts only hold keys
    /// that pass [`crate::domain::is_element_name`].
    #[must_use]
    pub fn lower_to_markup(&self, settings: &Map<String, Value>) -> String {
        let root = &self.root_element;
        if settings.is_empty() {
            return format!("<{root}/>");
        }

        let mut out = format!("<{root}>");
        for (name, value) in settings {
            write_element(&mut out, name, value);
        }
        out.push_str(&format!("</{root}>"));
        out
    }
}

/// Render with default export settings.
///
/// # Errors
/// Returns error if the underlying serializer fails.
pub fn render(draft: &ConfigurationDraft, format: ExportFormat) -> Result<String> {
    Exporter::default().render(draft, format)
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => out.push_str(&format!("<{name}/>")),
        Value::Object(map) if map.is_empty() => out.push_str(&format!("<{name}/>")),
        Value::Object(map) => {
            out.push_str(&format!("<{name}>"));
            for (child, child_value) in map {
                write_element(out, child, child_value);
            }
            out.push_str(&format!("</{name}>"));
        }
        Value::Array(items) if items.is_empty() => out.push_str(&format!("<{name}/>")),
        // Sequences become repeated sibling elements.
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item);
            }
        }
        Value::String(s) => out.push_str(&format!("<{name}>{}</{name}>", escape_text(s))),
        Value::Bool(b) => out.push_str(&format!("<{name}>{b}</{name}>")),
        Value::Number(n) => out.push_str(&format!("<{name}>{n}</{name}>")),
    }
}

fn escape_text(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keeps file names to a safe character set.
fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
