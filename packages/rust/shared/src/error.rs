//! Error types for SeoForge.
//!
//! Library crates use [`SeoForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SeoForge operations.
#[derive(Debug, thiserror::Error)]
pub enum SeoForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a sitemap or page.
    #[error("network error: {0}")]
    Network(String),

    /// XML/HTML parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Completion API error (auth, quota, transport, or malformed response).
    #[error("completion error: {0}")]
    Completion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Missing or malformed user input.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SeoForgeError>;

impl SeoForgeError {
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
        let err = SeoForgeError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = SeoForgeError::validation("primary keyword is required");
        assert!(err.to_string().contains("primary keyword"));

        let err = SeoForgeError::Completion("HTTP 401: bad key".into());
        assert_eq!(err.to_string(), "completion error: HTTP 401: bad key");
    }
}
