#![warn(missing_docs)]

//! Split planning and orchestration for the gridcut mesh splitter.
//!
//! Takes an in-memory triangle mesh and a working envelope (e.g. a 3D
//! printer's build volume) and produces one independent, preferably
//! watertight STL file per grid cell:
//!
//! 1. [`oriented_bounds`] — optional 180° reorientation, then the model
//!    bounding box.
//! 2. [`plan_split`] — envelope limits → an ordered grid of cell boxes
//!    (X and Y only; parts always span the full height).
//! 3. [`execute_split`] — per cell, exact clip-and-cap via `gridcut-clip`
//!    (falling back to coarse face selection when the input is not
//!    closed), then binary STL export via `gridcut-stl`.
//!
//! # Example
//!
//! ```ignore
//! use gridcut_split::{execute_split, oriented_bounds, plan_split, ExportOptions, SplitLimits};
//!
//! let bounds = oriented_bounds(&mut mesh, false)?;
//! let plan = plan_split(&bounds, &SplitLimits::default())?;
//! let report = execute_split(&mesh, &plan, &ExportOptions::new("out", "model"))?;
//! println!("created {} parts", report.parts_created);
//! ```

pub mod error;
pub mod exec;
pub mod plan;

pub use error::{Result, SplitError};
pub use exec::{
    execute_split, execute_split_with, CancelToken, CellOutcome, CellStatus, ExportOptions,
    NullObserver, PartMethod, SplitObserver, SplitReport,
};
pub use plan::{plan_split, Cell, SplitLimits, SplitPlan};

use gridcut_math::Transform;
use gridcut_mesh::{Aabb3, Mesh};
use serde::{Deserialize, Serialize};

/// Summary of a loaded model, as reported to the UI/CLI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Number of triangles.
    pub triangles: usize,
    /// Number of vertices.
    pub vertices: usize,
    /// True when every edge is shared by exactly two opposite faces.
    pub watertight: bool,
    /// Signed volume; only meaningful when `watertight` is true.
    pub volume: f64,
    /// Bounding box extent along X.
    pub width: f64,
    /// Bounding box extent along Y.
    pub depth: f64,
    /// Bounding box extent along Z.
    pub height: f64,
}

impl ModelInfo {
    /// Dimensions formatted as `W×D×H` with one decimal.
    pub fn dimensions(&self) -> String {
        format!("{:.1}×{:.1}×{:.1}", self.width, self.depth, self.height)
    }
}

/// Compute the model summary: counts, closedness, volume, and extents.
pub fn compute_info(mesh: &Mesh) -> Result<ModelInfo> {
    if mesh.vertices.is_empty() {
        return Err(SplitError::EmptyMesh);
    }
    let extents = mesh.bounds().extents();
    Ok(ModelInfo {
        triangles: mesh.triangle_count(),
        vertices: mesh.vertex_count(),
        watertight: mesh.is_closed(),
        volume: mesh.signed_volume(),
        width: extents.x,
        depth: extents.y,
        height: extents.z,
    })
}

/// Compute the model bounding box, optionally flipping the mesh first.
///
/// With `flip` set, applies the fixed 180° rotation about X (y and z
/// negated) to every vertex in place before measuring — the only mutation
/// the splitter ever performs on the input mesh.
pub fn oriented_bounds(mesh: &mut Mesh, flip: bool) -> Result<Aabb3> {
    if mesh.vertices.is_empty() {
        return Err(SplitError::EmptyMesh);
    }
    if flip {
        mesh.apply_transform(&Transform::flip_x());
    }
    Ok(mesh.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gridcut_mesh::make_box;

    #[test]
    fn test_compute_info_for_cube() {
        let mesh = make_box(100.0, 50.0, 25.0);
        let info = compute_info(&mesh).unwrap();
        assert_eq!(info.triangles, 12);
        assert_eq!(info.vertices, 8);
        assert!(info.watertight);
        assert_relative_eq!(info.volume, 125_000.0, max_relative = 1e-12);
        assert_eq!(info.dimensions(), "100.0×50.0×25.0");
    }

    #[test]
    fn test_compute_info_rejects_empty_mesh() {
        assert!(matches!(
            compute_info(&Mesh::new()),
            Err(SplitError::EmptyMesh)
        ));
    }

    #[test]
    fn test_oriented_bounds_without_flip() {
        let mut mesh = make_box(10.0, 20.0, 30.0);
        let before = mesh.vertices.clone();
        let bounds = oriented_bounds(&mut mesh, false).unwrap();
        assert_eq!(bounds.extents().x, 10.0);
        assert_eq!(mesh.vertices, before); // untouched
    }

    #[test]
    fn test_oriented_bounds_with_flip_mutates_in_place() {
        let mut mesh = make_box(10.0, 20.0, 30.0);
        let bounds = oriented_bounds(&mut mesh, true).unwrap();
        // Extents unchanged by a rigid flip, position mirrored
        let e = bounds.extents();
        assert_eq!((e.x, e.y, e.z), (10.0, 20.0, 30.0));
        assert_eq!(bounds.min.y, -20.0);
        assert_eq!(bounds.min.z, -30.0);
        assert!(mesh.is_closed());
    }
}
