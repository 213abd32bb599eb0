//! Indexed triangle mesh.
//!
//! The splitter's working representation: a vertex table plus faces as
//! index triples. Geometry stays f64 end to end; conversion to f32 happens
//! only in the STL encoder.

use std::collections::HashMap;

use gridcut_math::{Point3, Tolerance, Transform};

use crate::aabb::Aabb3;
use crate::error::{MeshError, Result};

/// An indexed triangle mesh.
///
/// Vertex order is significant: faces reference vertices by index, and the
/// compaction helpers guarantee a stable first-occurrence order so repeated
/// runs produce identical output files.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangles as vertex index triples. Winding determines the outward
    /// normal (right-hand rule).
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(p);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_face(&mut self, i0: u32, i1: u32, i2: u32) {
        self.faces.push([i0, i1, i2]);
    }

    /// Corner positions of face `i`.
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.faces[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Check structural invariants: at least one vertex, all face indices in range.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(MeshError::Empty);
        }
        let n = self.vertices.len();
        for (face, idx) in self.faces.iter().enumerate() {
            for &index in idx {
                if index as usize >= n {
                    return Err(MeshError::FaceIndexOutOfRange {
                        face,
                        index,
                        vertex_count: n,
                    });
                }
            }
        }
        Ok(())
    }

    /// Axis-aligned bounding box over all vertices.
    ///
    /// Empty mesh yields an inverted (empty) box.
    pub fn bounds(&self) -> Aabb3 {
        let mut aabb = Aabb3::empty();
        for v in &self.vertices {
            aabb.include_point(v);
        }
        aabb
    }

    /// Signed volume via the divergence theorem.
    ///
    /// Positive for a closed mesh with outward-facing normals. Meaningless
    /// for open meshes, which is why callers report it alongside the
    /// closedness flag.
    pub fn signed_volume(&self) -> f64 {
        let mut six_v = 0.0;
        for face in &self.faces {
            let v0 = self.vertices[face[0] as usize].coords;
            let v1 = self.vertices[face[1] as usize].coords;
            let v2 = self.vertices[face[2] as usize].coords;
            six_v += v0.dot(&v1.cross(&v2));
        }
        six_v / 6.0
    }

    /// Test whether the mesh is closed (watertight).
    ///
    /// Every directed edge must appear exactly once and be matched by its
    /// reverse, i.e. every undirected edge is shared by exactly two
    /// oppositely-wound faces. A mesh with no faces is not considered closed.
    pub fn is_closed(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let mut edges: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            for k in 0..3 {
                let a = face[k];
                let b = face[(k + 1) % 3];
                if a == b {
                    return false; // degenerate edge
                }
                *edges.entry((a, b)).or_insert(0) += 1;
            }
        }
        edges
            .iter()
            .all(|(&(a, b), &count)| count == 1 && edges.get(&(b, a)) == Some(&1))
    }

    /// Apply a rigid transform to every vertex in place.
    pub fn apply_transform(&mut self, t: &Transform) {
        for v in self.vertices.iter_mut() {
            *v = t.apply_point(v);
        }
    }

    /// Extract the sub-mesh consisting of the given faces.
    ///
    /// Vertices are renumbered densely in first-occurrence order over the
    /// retained faces, so the result has no orphan vertices and the remap
    /// is reproducible.
    pub fn submesh(&self, face_indices: &[usize]) -> Mesh {
        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut out = Mesh::with_capacity(face_indices.len(), face_indices.len());
        for &fi in face_indices {
            let face = self.faces[fi];
            let mut new_face = [0u32; 3];
            for (k, &old) in face.iter().enumerate() {
                let next = remap.len() as u32;
                let new = *remap.entry(old).or_insert_with(|| {
                    out.vertices.push(self.vertices[old as usize]);
                    next
                });
                new_face[k] = new;
            }
            out.faces.push(new_face);
        }
        out
    }

    /// Build an indexed mesh from a triangle soup, welding coincident
    /// corners within `weld_tol`.
    ///
    /// Corners are bucketed on coordinates quantized by the tolerance, so
    /// points produced by identical clip arithmetic always land in the same
    /// bucket. Triangles whose corners collapse into fewer than three
    /// distinct vertices are dropped. Vertex order is first-occurrence over
    /// the surviving triangles.
    pub fn from_triangle_soup(triangles: &[[Point3; 3]], weld_tol: f64) -> Mesh {
        let tol = if weld_tol > 0.0 {
            weld_tol
        } else {
            Tolerance::DEFAULT.linear
        };

        let key = |p: &Point3| -> (i64, i64, i64) {
            (
                (p.x / tol).round() as i64,
                (p.y / tol).round() as i64,
                (p.z / tol).round() as i64,
            )
        };

        // First pass: discard triangles that weld to a degenerate face, so
        // their corners never enter the vertex table as orphans.
        let kept: Vec<&[Point3; 3]> = triangles
            .iter()
            .filter(|tri| {
                let k0 = key(&tri[0]);
                let k1 = key(&tri[1]);
                let k2 = key(&tri[2]);
                k0 != k1 && k1 != k2 && k0 != k2
            })
            .collect();

        let mut index_of: HashMap<(i64, i64, i64), u32> = HashMap::new();
        let mut out = Mesh::with_capacity(kept.len() * 3 / 2, kept.len());
        for tri in kept {
            let mut face = [0u32; 3];
            for (k, p) in tri.iter().enumerate() {
                let next = index_of.len() as u32;
                let idx = *index_of.entry(key(p)).or_insert_with(|| {
                    out.vertices.push(*p);
                    next
                });
                face[k] = idx;
            }
            out.faces.push(face);
        }
        out
    }
}

/// Build a closed axis-aligned box mesh spanning `[0,w] × [0,d] × [0,h]`.
///
/// 8 vertices, 12 triangles, outward-facing normals.
pub fn make_box(w: f64, d: f64, h: f64) -> Mesh {
    let mut mesh = Mesh::with_capacity(8, 12);
    mesh.add_vertex(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.add_vertex(Point3::new(w, 0.0, 0.0)); // 1
    mesh.add_vertex(Point3::new(w, d, 0.0)); // 2
    mesh.add_vertex(Point3::new(0.0, d, 0.0)); // 3
    mesh.add_vertex(Point3::new(0.0, 0.0, h)); // 4
    mesh.add_vertex(Point3::new(w, 0.0, h)); // 5
    mesh.add_vertex(Point3::new(w, d, h)); // 6
    mesh.add_vertex(Point3::new(0.0, d, h)); // 7

    // bottom (-Z), top (+Z)
    mesh.add_face(0, 2, 1);
    mesh.add_face(0, 3, 2);
    mesh.add_face(4, 5, 6);
    mesh.add_face(4, 6, 7);
    // front (-Y), back (+Y)
    mesh.add_face(0, 1, 5);
    mesh.add_face(0, 5, 4);
    mesh.add_face(3, 7, 6);
    mesh.add_face(3, 6, 2);
    // left (-X), right (+X)
    mesh.add_face(0, 4, 7);
    mesh.add_face(0, 7, 3);
    mesh.add_face(1, 6, 5);
    mesh.add_face(1, 2, 6);

    mesh
}
