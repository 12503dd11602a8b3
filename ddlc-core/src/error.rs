//! Error types for ddlc core operations.

use thiserror::Error;

/// Core error type for payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Buffer is too short for the requested operation.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// Offset out of bounds.
    #[error("offset {offset} out of bounds for buffer of size {size}")]
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Buffer size in bytes.
        size: usize,
    },

    /// The layout contains a field that could not be generated.
    #[error("field '{field}' has no decoder: {reason}")]
    Unresolved {
        /// Qualified field name.
        field: String,
        /// Why the field could not be generated.
        reason: String,
    },
}

/// Result type alias for ddlc core operations.
pub type Result<T> = std::result::Result<T, Error>;
