//! Error types for split planning and execution.

use thiserror::Error;

/// Errors that can occur while planning or executing a split.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Input mesh has no vertices — nothing to split.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// Envelope limits are unusable (NaN or infinite).
    #[error("invalid limits: {0}")]
    InvalidLimits(String),

    /// Every cell came up empty or failed; no output was produced.
    #[error("no parts were created")]
    NoPartsCreated,

    /// I/O failure outside of per-cell part writing (e.g. creating the
    /// output directory). Per-cell write failures are recorded in the
    /// report instead.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;
