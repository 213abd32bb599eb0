//! Cap triangulation — sealing clip boundaries with planar geometry.
//!
//! Boundary loops on a cut plane enclose the region where material was
//! removed. The region is triangulated in 2D (loops projected into the
//! plane, outer boundaries and holes separated by even-odd containment,
//! holes bridged into their outer loop, then ear clipping) and the
//! triangles are lifted back to 3D oriented outward from the retained
//! volume.

use gridcut_math::{Point2, Point3, Tolerance};

use crate::clip::CutPlane;
use crate::error::{ClipError, Result};

/// Triangulate the regions enclosed by boundary loops on a cut plane.
///
/// Returns cap triangles wound so their normal points out of the kept
/// half-space (outward from the retained volume).
pub fn cap_plane(
    rings: &[Vec<Point3>],
    plane: &CutPlane,
    tol: &Tolerance,
) -> Result<Vec<[Point3; 3]>> {
    let fail = || ClipError::CapTriangulationFailed {
        axis: plane.axis_char(),
        value: plane.value,
    };

    let (u_axis, v_axis) = plane_uv_axes(plane);
    let project = |p: &Point3| Point2::new(p[u_axis], p[v_axis]);
    let lift = |q: &Point2| {
        let mut p = Point3::origin();
        p[plane.axis] = plane.value;
        p[u_axis] = q.x;
        p[v_axis] = q.y;
        p
    };

    // Project, dropping rings whose enclosed area is negligible (loops left
    // over from geometry tangent to the plane).
    let mut polys: Vec<Vec<Point2>> = Vec::with_capacity(rings.len());
    for ring in rings {
        let poly: Vec<Point2> = ring.iter().map(&project).collect();
        if signed_area(&poly).abs() > tol.linear {
            polys.push(poly);
        }
    }
    if polys.is_empty() {
        return Ok(Vec::new());
    }

    // Even-odd containment depth: even = outer boundary, odd = hole.
    let depths: Vec<usize> = (0..polys.len())
        .map(|i| {
            (0..polys.len())
                .filter(|&j| j != i && polygon_contains(&polys[j], &polys[i][0]))
                .count()
        })
        .collect();

    // Normalize winding: outer loops CCW, holes CW (in the plane's uv
    // frame, where CCW lifts to an outward-facing triangle).
    for (poly, &depth) in polys.iter_mut().zip(&depths) {
        let ccw = signed_area(poly) > 0.0;
        let want_ccw = depth % 2 == 0;
        if ccw != want_ccw {
            poly.reverse();
        }
    }

    let mut triangles = Vec::new();
    for outer_idx in 0..polys.len() {
        if depths[outer_idx] % 2 != 0 {
            continue;
        }
        // Holes belonging to this outer: contained in it, one level deeper,
        // and not contained in any other outer nested inside it.
        let holes: Vec<Vec<Point2>> = (0..polys.len())
            .filter(|&j| {
                depths[j] == depths[outer_idx] + 1
                    && polygon_contains(&polys[outer_idx], &polys[j][0])
            })
            .map(|j| polys[j].clone())
            .collect();

        let merged = bridge_holes(polys[outer_idx].clone(), holes);
        let tris = ear_clip(&merged).ok_or_else(fail)?;
        for [a, b, c] in tris {
            triangles.push([lift(&merged[a]), lift(&merged[b]), lift(&merged[c])]);
        }
    }

    Ok(triangles)
}

/// The in-plane axes (u, v) ordered so that u × v equals the cap's outward
/// normal — the direction pointing out of the kept half-space.
fn plane_uv_axes(plane: &CutPlane) -> (usize, usize) {
    let next = (plane.axis + 1) % 3;
    let next2 = (plane.axis + 2) % 3;
    if plane.keep_above {
        // outward is -axis
        (next2, next)
    } else {
        // outward is +axis
        (next, next2)
    }
}

/// Shoelace signed area; positive for CCW winding.
fn signed_area(poly: &[Point2]) -> f64 {
    let n = poly.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Even-odd point-in-polygon test.
fn polygon_contains(poly: &[Point2], p: &Point2) -> bool {
    let n = poly.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = poly[i];
        let b = poly[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Splice hole loops into the outer loop with zero-width bridges.
///
/// Each hole is joined at its maximum-u vertex to a nearby outer vertex;
/// holes are processed right-to-left so earlier bridges do not separate a
/// later hole from the outer boundary. Bridge junction vertices appear
/// twice in the result, which ear clipping tolerates.
fn bridge_holes(outer: Vec<Point2>, mut holes: Vec<Vec<Point2>>) -> Vec<Point2> {
    let max_u = |poly: &[Point2]| {
        poly.iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max)
    };
    holes.sort_by(|a, b| max_u(b).total_cmp(&max_u(a)));

    let mut poly = outer;
    for hole in holes {
        let h = hole
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let hp = hole[h];

        // Prefer outer vertices to the right of the junction (toward which
        // the bridge cannot cross the hole itself), nearest first.
        let o = poly
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x >= hp.x)
            .min_by(|(_, a), (_, b)| dist2(a, &hp).total_cmp(&dist2(b, &hp)))
            .or_else(|| {
                poly.iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| dist2(a, &hp).total_cmp(&dist2(b, &hp)))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut merged = Vec::with_capacity(poly.len() + hole.len() + 2);
        merged.extend_from_slice(&poly[..=o]);
        merged.extend_from_slice(&hole[h..]);
        merged.extend_from_slice(&hole[..=h]);
        merged.extend_from_slice(&poly[o..]);
        poly = merged;
    }
    poly
}

fn dist2(a: &Point2, b: &Point2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Ear-clip triangulation of a CCW simple polygon (bridge-duplicated
/// vertices allowed). Returns `None` when no ear can be found, which the
/// caller reports as a capping failure.
fn ear_clip(poly: &[Point2]) -> Option<Vec<[usize; 3]>> {
    if poly.len() < 3 {
        return Some(Vec::new());
    }

    let mut remaining: Vec<usize> = (0..poly.len()).collect();
    let mut out = Vec::with_capacity(poly.len() - 2);

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut found_ear = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            let a = poly[remaining[prev]];
            let b = poly[remaining[i]];
            let c = poly[remaining[next]];

            // Convex corner test (CCW polygon)
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if cross <= 0.0 {
                continue;
            }

            // No other vertex may lie inside the candidate ear
            let mut is_ear = true;
            for j in 0..n {
                if j == prev || j == i || j == next {
                    continue;
                }
                if point_in_triangle_2d(&poly[remaining[j]], &a, &b, &c) {
                    is_ear = false;
                    break;
                }
            }

            if is_ear {
                out.push([remaining[prev], remaining[i], remaining[next]]);
                remaining.remove(i);
                found_ear = true;
                break;
            }
        }

        if !found_ear {
            return None;
        }
    }

    out.push([remaining[0], remaining[1], remaining[2]]);
    Some(out)
}

/// Strict interior test via barycentric coordinates; points on the
/// boundary (including bridge duplicates) do not count as inside.
fn point_in_triangle_2d(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let v0 = (c.x - a.x, c.y - a.y);
    let v1 = (b.x - a.x, b.y - a.y);
    let v2 = (p.x - a.x, p.y - a.y);

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-30 {
        return false;
    }
    let inv_denom = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}
