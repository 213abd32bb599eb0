//! Sutherland–Hodgman triangle clipping against axis-aligned half-spaces.
//!
//! A cell box is six half-space constraints. Clipping proceeds one plane
//! at a time over the whole working triangle set: each pass returns the
//! surviving (possibly cut) triangles plus the polygon edges that lie on
//! the cut plane, which the capping stage seals back up.

use gridcut_math::{Point3, Tolerance};
use gridcut_mesh::Aabb3;
use rayon::prelude::*;

/// One of the six half-space constraints of a cell box.
///
/// Points with `signed_distance >= 0` are kept.
#[derive(Debug, Clone, Copy)]
pub struct CutPlane {
    /// Axis the plane is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub axis: usize,
    /// Plane position along that axis.
    pub value: f64,
    /// Keep the side with larger coordinates (`p[axis] >= value`).
    pub keep_above: bool,
}

impl CutPlane {
    /// The six half-space constraints of a box, in axis order
    /// (x≥min, x≤max, y≥min, y≤max, z≥min, z≤max).
    pub fn box_planes(cell: &Aabb3) -> [CutPlane; 6] {
        [
            CutPlane { axis: 0, value: cell.min.x, keep_above: true },
            CutPlane { axis: 0, value: cell.max.x, keep_above: false },
            CutPlane { axis: 1, value: cell.min.y, keep_above: true },
            CutPlane { axis: 1, value: cell.max.y, keep_above: false },
            CutPlane { axis: 2, value: cell.min.z, keep_above: true },
            CutPlane { axis: 2, value: cell.max.z, keep_above: false },
        ]
    }

    /// Signed distance to the plane; non-negative on the kept side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        if self.keep_above {
            p[self.axis] - self.value
        } else {
            self.value - p[self.axis]
        }
    }

    /// True if `p` lies on the plane within tolerance.
    pub fn on_plane(&self, p: &Point3, tol: &Tolerance) -> bool {
        tol.is_zero(p[self.axis] - self.value)
    }

    /// Axis label for error reporting.
    pub fn axis_char(&self) -> char {
        match self.axis {
            0 => 'x',
            1 => 'y',
            _ => 'z',
        }
    }
}

/// Result of clipping one triangle set against one plane.
pub struct PlanePass {
    /// Surviving triangles (cut triangles re-triangulated).
    pub triangles: Vec<[Point3; 3]>,
    /// Directed polygon edges lying on the cut plane, wound like the
    /// polygons they came from.
    pub cut_edges: Vec<(Point3, Point3)>,
}

/// Clip every triangle against one half-space constraint.
pub fn clip_triangles(
    triangles: &[[Point3; 3]],
    plane: &CutPlane,
    tol: &Tolerance,
) -> PlanePass {
    let per_triangle: Vec<(Vec<[Point3; 3]>, Vec<(Point3, Point3)>)> = triangles
        .par_iter()
        .map(|tri| clip_one(tri, plane, tol))
        .collect();

    let mut out = PlanePass {
        triangles: Vec::with_capacity(triangles.len()),
        cut_edges: Vec::new(),
    };
    for (tris, edges) in per_triangle {
        out.triangles.extend(tris);
        out.cut_edges.extend(edges);
    }
    out
}

/// Clip a single triangle, returning its surviving fan triangles and any
/// polygon edges on the cut plane.
fn clip_one(
    tri: &[Point3; 3],
    plane: &CutPlane,
    tol: &Tolerance,
) -> (Vec<[Point3; 3]>, Vec<(Point3, Point3)>) {
    let poly = clip_polygon(tri, plane, tol);
    if poly.len() < 3 {
        return (Vec::new(), Vec::new());
    }

    // Edges with both endpoints on the plane are cut edges: either freshly
    // created by this clip or belonging to geometry tangent to the plane.
    // The tangent ones cancel pairwise later; the fresh ones seed the caps.
    let mut cut_edges = Vec::new();
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        if plane.on_plane(&a, tol) && plane.on_plane(&b, tol) {
            cut_edges.push((a, b));
        }
    }

    let mut triangles = Vec::with_capacity(poly.len() - 2);
    for i in 1..poly.len() - 1 {
        triangles.push([poly[0], poly[i], poly[i + 1]]);
    }
    (triangles, cut_edges)
}

/// Sutherland–Hodgman clip of a convex polygon against one half-space.
///
/// Vertices on the plane (within tolerance) count as inside, so geometry
/// tangent to a cell face is retained whole.
fn clip_polygon(poly: &[Point3], plane: &CutPlane, tol: &Tolerance) -> Vec<Point3> {
    let n = poly.len();
    let mut out: Vec<Point3> = Vec::with_capacity(n + 1);
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let da = plane.signed_distance(&a);
        let db = plane.signed_distance(&b);
        let a_in = da >= -tol.linear;
        let b_in = db >= -tol.linear;
        if a_in {
            push_unique(&mut out, a, tol);
        }
        if a_in != b_in {
            push_unique(&mut out, intersect(&a, &b, plane), tol);
        }
    }
    // The wrap-around edge can duplicate the first vertex
    if out.len() > 1 && tol.points_equal(&out[0], out.last().unwrap()) {
        out.pop();
    }
    out
}

fn push_unique(out: &mut Vec<Point3>, p: Point3, tol: &Tolerance) {
    if let Some(last) = out.last() {
        if tol.points_equal(last, &p) {
            return;
        }
    }
    out.push(p);
}

/// Intersection of segment `ab` with the plane.
///
/// Interpolates from the lexicographically smaller endpoint so the two
/// triangles sharing an edge compute bitwise-identical cut points, and
/// snaps the plane coordinate exactly onto the plane — capping relies on
/// cut vertices lying exactly on the cut plane.
fn intersect(a: &Point3, b: &Point3, plane: &CutPlane) -> Point3 {
    let (p, q) = if lex_less(b, a) { (b, a) } else { (a, b) };
    let dp = p[plane.axis] - plane.value;
    let dq = q[plane.axis] - plane.value;
    let t = dp / (dp - dq);
    let mut r = p + (q - p) * t;
    r[plane.axis] = plane.value;
    r
}

fn lex_less(a: &Point3, b: &Point3) -> bool {
    (a.x, a.y, a.z) < (b.x, b.y, b.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> [Point3; 3] {
        [
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ]
    }

    #[test]
    fn test_triangle_fully_inside_unchanged() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let plane = CutPlane { axis: 0, value: -5.0, keep_above: true };
        let pass = clip_triangles(&[t], &plane, &Tolerance::DEFAULT);
        assert_eq!(pass.triangles.len(), 1);
        assert!(pass.cut_edges.is_empty());
    }

    #[test]
    fn test_triangle_fully_outside_dropped() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let plane = CutPlane { axis: 0, value: 5.0, keep_above: true };
        let pass = clip_triangles(&[t], &plane, &Tolerance::DEFAULT);
        assert!(pass.triangles.is_empty());
        assert!(pass.cut_edges.is_empty());
    }

    #[test]
    fn test_triangle_straddling_is_cut() {
        // One vertex kept, two clipped away → quadrilateral... here the
        // opposite: two kept, one clipped → quad → two fan triangles.
        let t = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        let plane = CutPlane { axis: 0, value: 1.0, keep_above: false };
        let pass = clip_triangles(&[t], &plane, &Tolerance::DEFAULT);
        assert_eq!(pass.triangles.len(), 2);
        assert_eq!(pass.cut_edges.len(), 1);
        let (a, b) = pass.cut_edges[0];
        assert_eq!(a.x, 1.0);
        assert_eq!(b.x, 1.0);
    }

    #[test]
    fn test_cut_vertices_snap_to_plane() {
        let t = tri([0.3, 0.1, 0.0], [2.7, 0.2, 0.5], [0.4, 1.9, 1.0]);
        let plane = CutPlane { axis: 0, value: 1.1, keep_above: true };
        let pass = clip_triangles(&[t], &plane, &Tolerance::DEFAULT);
        for (a, b) in &pass.cut_edges {
            assert_eq!(a.x, 1.1);
            assert_eq!(b.x, 1.1);
        }
    }

    #[test]
    fn test_shared_edge_cut_points_are_identical() {
        // Two triangles sharing the edge (2,0,0)-(0,2,0), listed with
        // opposite winding of that edge. The cut points must match exactly.
        let t1 = tri([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
        let t2 = tri([2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]);
        let plane = CutPlane { axis: 1, value: 1.0, keep_above: false };
        let p1 = clip_triangles(&[t1], &plane, &Tolerance::DEFAULT);
        let p2 = clip_triangles(&[t2], &plane, &Tolerance::DEFAULT);
        // The shared edge crosses y=1 at (1,1,0) for both triangles
        let hit1 = p1
            .cut_edges
            .iter()
            .flat_map(|(a, b)| [a, b])
            .find(|p| (p.x - 1.0).abs() < 1e-12)
            .copied()
            .unwrap();
        let hit2 = p2
            .cut_edges
            .iter()
            .flat_map(|(a, b)| [a, b])
            .find(|p| (p.x - 1.0).abs() < 1e-12)
            .copied()
            .unwrap();
        assert_eq!(hit1, hit2);
    }

    #[test]
    fn test_coplanar_triangle_kept_with_all_edges_cut() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let plane = CutPlane { axis: 2, value: 0.0, keep_above: true };
        let pass = clip_triangles(&[t], &plane, &Tolerance::DEFAULT);
        assert_eq!(pass.triangles.len(), 1);
        assert_eq!(pass.cut_edges.len(), 3);
    }
}
