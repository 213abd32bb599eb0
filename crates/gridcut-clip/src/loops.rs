//! Boundary-loop extraction on a cut plane.
//!
//! After one clipping pass, edges on the cut plane come from two sources:
//! fresh cuts (each appearing once) and geometry tangent to the plane
//! (interior edges appearing twice with opposite directions, which cancel).
//! What remains after cancellation is the open boundary left by the clip,
//! and it must chain into closed loops when the input surface is closed.

use std::collections::HashMap;

use gridcut_math::{Point3, Tolerance};

use crate::clip::CutPlane;
use crate::error::{ClipError, Result};

type QuantKey = (i64, i64, i64);

fn quantize(p: &Point3, tol: &Tolerance) -> QuantKey {
    (
        (p.x / tol.linear).round() as i64,
        (p.y / tol.linear).round() as i64,
        (p.z / tol.linear).round() as i64,
    )
}

/// Remove directed edges that are matched by their exact reverse.
///
/// An edge shared by two retained polygons on the plane appears once per
/// polygon, in opposite directions; both are interior and cancel. Edges of
/// zero length (within tolerance) are dropped outright.
pub fn cancel_opposites(
    edges: Vec<(Point3, Point3)>,
    tol: &Tolerance,
) -> Vec<(Point3, Point3)> {
    let mut unmatched: HashMap<(QuantKey, QuantKey), Vec<(Point3, Point3)>> = HashMap::new();
    for (a, b) in edges {
        let ka = quantize(&a, tol);
        let kb = quantize(&b, tol);
        if ka == kb {
            continue;
        }
        if let Some(bucket) = unmatched.get_mut(&(kb, ka)) {
            bucket.pop();
            if bucket.is_empty() {
                unmatched.remove(&(kb, ka));
            }
        } else {
            unmatched.entry((ka, kb)).or_default().push((a, b));
        }
    }
    unmatched.into_values().flatten().collect()
}

/// Chain directed cut edges into closed loops by endpoint matching.
///
/// Matching is tolerance-based: clip arithmetic introduces small floating
/// error, so endpoints are compared on quantized coordinates. Returns the
/// loops as vertex rings (implicitly closed, first vertex not repeated).
///
/// Fails with [`ClipError::OpenBoundaryLoop`] if any chain runs out of
/// successors before returning to its start — the signature of
/// non-manifold or self-intersecting input.
pub fn chain_loops(
    edges: &[(Point3, Point3)],
    plane: &CutPlane,
    tol: &Tolerance,
) -> Result<Vec<Vec<Point3>>> {
    let open_loop_err = || ClipError::OpenBoundaryLoop {
        axis: plane.axis_char(),
        value: plane.value,
    };

    // Index unused edges by the quantized start point
    let mut by_start: HashMap<QuantKey, Vec<usize>> = HashMap::new();
    for (i, (a, _)) in edges.iter().enumerate() {
        by_start.entry(quantize(a, tol)).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut rings: Vec<Vec<Point3>> = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let start_key = quantize(&edges[start].0, tol);
        let mut ring = vec![edges[start].0];
        let mut cursor = quantize(&edges[start].1, tol);
        let mut cursor_point = edges[start].1;

        while cursor != start_key {
            let next = by_start
                .get_mut(&cursor)
                .and_then(|bucket| {
                    let pos = bucket.iter().position(|&i| !used[i])?;
                    Some(bucket.swap_remove(pos))
                })
                .ok_or_else(open_loop_err)?;
            used[next] = true;
            ring.push(cursor_point);
            cursor = quantize(&edges[next].1, tol);
            cursor_point = edges[next].1;
        }

        // Loops degenerated to a sliver by cancellation are dropped
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }

    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn plane_x0() -> CutPlane {
        CutPlane {
            axis: 0,
            value: 0.0,
            keep_above: true,
        }
    }

    #[test]
    fn test_cancel_removes_opposite_pairs() {
        let edges = vec![
            (p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            (p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0)),
            (p(0.0, 1.0, 0.0), p(0.0, 1.0, 1.0)),
        ];
        let remaining = cancel_opposites(edges, &Tolerance::DEFAULT);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].0, p(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_cancel_drops_zero_length_edges() {
        let edges = vec![(p(0.0, 0.0, 0.0), p(0.0, 1e-9, 0.0))];
        let remaining = cancel_opposites(edges, &Tolerance::DEFAULT);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_chain_square_loop() {
        // Square on the x=0 plane, edges given out of order
        let edges = vec![
            (p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            (p(0.0, 1.0, 1.0), p(0.0, 0.0, 1.0)),
            (p(0.0, 1.0, 0.0), p(0.0, 1.0, 1.0)),
            (p(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0)),
        ];
        let rings = chain_loops(&edges, &plane_x0(), &Tolerance::DEFAULT).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_chain_two_disjoint_loops() {
        let edges = vec![
            // triangle A
            (p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            (p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)),
            (p(0.0, 0.0, 1.0), p(0.0, 0.0, 0.0)),
            // triangle B
            (p(0.0, 5.0, 5.0), p(0.0, 6.0, 5.0)),
            (p(0.0, 6.0, 5.0), p(0.0, 5.0, 6.0)),
            (p(0.0, 5.0, 6.0), p(0.0, 5.0, 5.0)),
        ];
        let rings = chain_loops(&edges, &plane_x0(), &Tolerance::DEFAULT).unwrap();
        assert_eq!(rings.len(), 2);
    }

    #[test]
    fn test_chain_tolerates_small_gaps() {
        let eps = 1e-8; // below the default 1e-6 tolerance
        let edges = vec![
            (p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            (p(0.0, 1.0 + eps, 0.0), p(0.0, 1.0, 1.0)),
            (p(0.0, 1.0, 1.0 - eps), p(0.0, 0.0, 1.0)),
            (p(0.0, 0.0, 1.0), p(0.0, eps, 0.0)),
        ];
        let rings = chain_loops(&edges, &plane_x0(), &Tolerance::DEFAULT).unwrap();
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn test_chain_reports_open_boundary() {
        let edges = vec![
            (p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            (p(0.0, 1.0, 0.0), p(0.0, 1.0, 1.0)),
            // gap: nothing returns to (0,0,0)
        ];
        let err = chain_loops(&edges, &plane_x0(), &Tolerance::DEFAULT).unwrap_err();
        assert!(matches!(err, ClipError::OpenBoundaryLoop { axis: 'x', .. }));
    }
}
