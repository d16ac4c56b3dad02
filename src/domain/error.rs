//! Domain-level error types for cache-config.
//!
//! All errors are typed with `thiserror`. The core transformations (store,
//! exporter, filter) never produce them for well-formed input; they surface
//! from configuration loading, path parsing and file I/O.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unusable input data (draft files, setting values).
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A setting path could not be parsed.
    #[error("Invalid setting path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Serializing a draft into an export format failed.
    #[error("Serialization error: {message}")]
    Serialize {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a serialization error from any serializer error.
    pub fn serialize(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Serialize {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_message() {
        let err = AppError::invalid_path("a..b", "empty segment");
        assert_eq!(
            err.to_string(),
            "Invalid setting path 'a..b': empty segment"
        );
    }

    #[test]
    fn test_json_parse_keeps_source() {
        let raw = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::json_parse(raw);
        assert!(std::error::Error::source(&err).is_some());
    }
}
