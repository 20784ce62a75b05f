//! Error types for patterndocs.
//!
//! Library crates use [`PatternDocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all patterndocs operations.
#[derive(Debug, thiserror::Error)]
pub enum PatternDocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching the pattern feed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Feed parsing or structural query error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A bug pattern entry carries no details element to document.
    #[error("bug pattern {id} has no details element")]
    MissingDetails { id: String },

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unsafe pattern id, missing output directory, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PatternDocsError>;

impl PatternDocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PatternDocsError::config("feed url is not valid");
        assert_eq!(err.to_string(), "config error: feed url is not valid");

        let err = PatternDocsError::MissingDetails {
            id: "XSS_SERVLET".into(),
        };
        assert_eq!(
            err.to_string(),
            "bug pattern XSS_SERVLET has no details element"
        );

        let err = PatternDocsError::validation("output directory does not exist");
        assert!(err.to_string().contains("output directory"));
    }
}
