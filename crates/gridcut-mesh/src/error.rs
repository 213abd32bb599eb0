//! Error types for mesh validation.

use thiserror::Error;

/// Errors produced when validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Mesh has no vertices.
    #[error("mesh has no vertices")]
    Empty,

    /// A face references a vertex index that does not exist.
    #[error("face {face} references vertex {index} but mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
