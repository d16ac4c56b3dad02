//! Export formats and the viewer languages they are shown with.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Textual serialization a draft can be exported as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExportFormat {
    /// Object notation.
    Json,
    /// Block notation.
    Yaml,
    /// Structured markup.
    Xml,
    /// Unspecified; rendered like markup and shown as plain text.
    #[default]
    PlainText,
}

impl ExportFormat {
    /// Every defined format, in display order.
    pub const ALL: [Self; 4] = [Self::Json, Self::Yaml, Self::Xml, Self::PlainText];

    /// Canonical upper-case tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Xml => "XML",
            Self::PlainText => "TEXT",
        }
    }

    /// File extension used when the export is saved.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::PlainText => "txt",
        }
    }
}

/// Any tag parses; unknown ones fall back to plain text.
impl From<&str> for ExportFormat {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "xml" => Self::Xml,
            _ => Self::PlainText,
        }
    }
}

impl From<String> for ExportFormat {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ExportFormat> for String {
    fn from(format: ExportFormat) -> Self {
        format.tag().to_string()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Language identifier understood by the syntax-highlighting viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    Json,
    Yaml,
    Xml,
    PlainText,
}

impl LanguageTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::PlainText => "plaintext",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an export format to the viewer language.
#[must_use]
pub const fn to_display_language(format: ExportFormat) -> LanguageTag {
    match format {
        ExportFormat::Json => LanguageTag::Json,
        ExportFormat::Yaml => LanguageTag::Yaml,
        ExportFormat::Xml => LanguageTag::Xml,
        ExportFormat::PlainText => LanguageTag::PlainText,
    }
}
