//! Error types for PAM matrix generation
//!
//! One variant per failure kind a run can hit. Every error is fatal to the
//! invocation that raised it; nothing is retried or patched over.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, transforming, scoring or writing a matrix
#[derive(Debug, Error)]
pub enum PamError {
    /// Malformed or missing header/rows in a matrix file
    #[error("format error in {source_name} (line {line}): {message}")]
    Format {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Non-square matrix or mismatched dimensions
    #[error("dimension error: {0}")]
    Dimension(String),

    /// Out-of-range argument (frequency length, exponent, scale, ...)
    #[error("value error: {0}")]
    Value(String),

    /// Malformed configuration file
    #[error("config error: {0}")]
    Config(String),

    /// Unreadable input or unwritable output
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PamError {
    pub(crate) fn format(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        PamError::Format {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PamError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PamError>;
