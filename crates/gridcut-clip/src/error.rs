//! Error types for clipping.
//!
//! Every clipping error is per-cell recoverable: the orchestrator catches
//! it and retries the cell with the coarse face selector.

use thiserror::Error;

/// Errors that can occur while clipping a mesh against a cell box.
#[derive(Error, Debug)]
pub enum ClipError {
    /// Cut edges on a box plane could not be chained into closed loops,
    /// usually because the input mesh is non-manifold or self-intersecting.
    #[error("cut boundary on plane {axis}={value} does not close into loops")]
    OpenBoundaryLoop {
        /// Axis the cut plane is perpendicular to (`'x'`, `'y'` or `'z'`).
        axis: char,
        /// Position of the cut plane along that axis.
        value: f64,
    },

    /// A cap region could not be triangulated.
    #[error("cap triangulation failed on plane {axis}={value}")]
    CapTriangulationFailed {
        /// Axis the cut plane is perpendicular to (`'x'`, `'y'` or `'z'`).
        axis: char,
        /// Position of the cut plane along that axis.
        value: f64,
    },
}

/// Result type for clipping operations.
pub type Result<T> = std::result::Result<T, ClipError>;
