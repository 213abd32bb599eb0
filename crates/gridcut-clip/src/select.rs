//! Coarse face selection — the fallback partitioner.
//!
//! Used when exact clipping fails or the input mesh is not closed to begin
//! with. A face is retained for a cell when any of its vertices lies
//! within the cell's box (boundary inclusive). Straddling triangles are
//! kept whole, so a triangle can extend past its nominal cell and appear
//! in more than one cell's output; that duplication is the accepted cost
//! of this mode.

use gridcut_mesh::{Aabb3, Mesh};

/// Select the faces touching a cell and build a compact sub-mesh of them.
///
/// Vertices of the result are renumbered in first-occurrence order over
/// the retained faces. An empty result means the cell has no geometry.
pub fn select_faces_in_box(mesh: &Mesh, cell: &Aabb3) -> Mesh {
    let selected: Vec<usize> = mesh
        .faces
        .iter()
        .enumerate()
        .filter(|(_, face)| {
            face.iter()
                .any(|&vi| cell.contains_point(&mesh.vertices[vi as usize]))
        })
        .map(|(i, _)| i)
        .collect();
    mesh.submesh(&selected)
}
