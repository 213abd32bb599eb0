//! Error types for STL serialization.

use thiserror::Error;

/// Errors that can occur reading or writing binary STL.
#[derive(Error, Debug)]
pub enum StlError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is too short for the declared triangle count.
    #[error("truncated STL: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Byte length implied by the header's triangle count.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// File is too short to contain the 80-byte header and triangle count.
    #[error("not a binary STL: only {0} bytes")]
    TooShort(usize),
}

/// Result type for STL operations.
pub type Result<T> = std::result::Result<T, StlError>;
