#![warn(missing_docs)]

//! Watertight box clipping for the gridcut mesh splitter.
//!
//! The core operation is [`clip_to_box`]: the exact intersection of a
//! closed triangle mesh with an axis-aligned cell box, produced without an
//! external boolean engine. The box is applied one half-space at a time;
//! each pass clips every working triangle (Sutherland–Hodgman), extracts
//! the boundary loops left on the cut plane, and seals them with cap
//! triangles before the next plane is applied. Feeding each pass a closed
//! surface is what guarantees the boundary loops of the next pass close.
//!
//! [`select_faces_in_box`] is the coarse fallback for input that is not
//! closed (or for cells where loop extraction fails): whole-triangle
//! selection by vertex containment, with no geometric guarantees beyond
//! "every output face touches the cell".

pub mod cap;
pub mod clip;
pub mod error;
pub mod loops;
pub mod select;

pub use error::{ClipError, Result};
pub use select::select_faces_in_box;

use gridcut_math::Tolerance;
use gridcut_mesh::{Aabb3, Mesh};

use crate::clip::CutPlane;

/// Clip a mesh to a cell box, capping every cut so a closed input yields a
/// closed output.
///
/// An empty result mesh means the cell contains no geometry; that is a
/// normal outcome, not an error. Errors indicate the cut boundary could
/// not be reconstructed (non-manifold or self-intersecting input) and the
/// caller should fall back to [`select_faces_in_box`].
pub fn clip_to_box(mesh: &Mesh, cell: &Aabb3, tol: &Tolerance) -> Result<Mesh> {
    let mut triangles: Vec<_> = (0..mesh.triangle_count())
        .map(|i| mesh.triangle(i))
        .collect();

    for plane in CutPlane::box_planes(cell) {
        if triangles.is_empty() {
            break;
        }
        let pass = clip::clip_triangles(&triangles, &plane, tol);
        triangles = pass.triangles;

        let boundary = loops::cancel_opposites(pass.cut_edges, tol);
        if !boundary.is_empty() {
            let rings = loops::chain_loops(&boundary, &plane, tol)?;
            let caps = cap::cap_plane(&rings, &plane, tol)?;
            triangles.extend(caps);
        }
    }

    Ok(Mesh::from_triangle_soup(&triangles, tol.linear))
}
