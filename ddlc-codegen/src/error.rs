//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] ddlc_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output file could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Namespace filter names a namespace the document does not have.
    #[error("unknown namespace '{name}'")]
    UnknownNamespace {
        /// Namespace name.
        name: String,
    },
}
