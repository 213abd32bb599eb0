#![warn(missing_docs)]

//! Binary STL serialization for the gridcut mesh splitter.
//!
//! The fixed little-endian layout: an 80-byte free-form ASCII header, a
//! u32 triangle count, then 50 bytes per triangle (normal, three vertices
//! in face order, and a two-byte attribute field written as zero). The
//! encoder is a pure function of the mesh; the reader exists so exported
//! parts can be loaded back and verified.

pub mod error;

pub use error::{Result, StlError};

use std::fs;
use std::path::Path;

use gridcut_math::{Point3, Vec3};
use gridcut_mesh::Mesh;

/// Fixed header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one encoded triangle: normal + 3 vertices + attribute.
const TRIANGLE_SIZE: usize = 50;

/// Encode a mesh as binary STL.
///
/// The header text is truncated or null-padded to exactly 80 bytes.
pub fn write_stl_bytes(mesh: &Mesh, header: &str) -> Vec<u8> {
    let num_triangles = mesh.triangle_count();
    let mut data = Vec::with_capacity(HEADER_SIZE + 4 + num_triangles * TRIANGLE_SIZE);

    let mut header_bytes = [0u8; HEADER_SIZE];
    for (dst, &src) in header_bytes.iter_mut().zip(header.as_bytes()) {
        *dst = src;
    }
    data.extend_from_slice(&header_bytes);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for i in 0..num_triangles {
        let tri = mesh.triangle(i);
        let n = facet_normal(&tri);
        for v in [n.x, n.y, n.z] {
            data.extend_from_slice(&(v as f32).to_le_bytes());
        }
        for p in &tri {
            for v in [p.x, p.y, p.z] {
                data.extend_from_slice(&(v as f32).to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Write a mesh to a binary STL file.
pub fn write_stl<P: AsRef<Path>>(path: P, mesh: &Mesh, header: &str) -> Result<()> {
    fs::write(path, write_stl_bytes(mesh, header))?;
    Ok(())
}

/// Decode a binary STL byte buffer into an indexed mesh.
///
/// Exactly coincident triangle corners are welded back into shared
/// vertices; the file's normals are ignored (they are recomputed on
/// write).
pub fn read_stl_bytes(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(StlError::TooShort(data.len()));
    }
    let count =
        u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let expected = HEADER_SIZE + 4 + count * TRIANGLE_SIZE;
    if data.len() < expected {
        return Err(StlError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let read_f32 = |offset: usize| {
        f32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ])
    };

    let mut triangles = Vec::with_capacity(count);
    for i in 0..count {
        let base = HEADER_SIZE + 4 + i * TRIANGLE_SIZE;
        let mut corners = [Point3::origin(); 3];
        for (k, corner) in corners.iter_mut().enumerate() {
            // Skip the 12-byte normal, then 12 bytes per vertex
            let off = base + 12 + k * 12;
            *corner = Point3::new(
                read_f32(off) as f64,
                read_f32(off + 4) as f64,
                read_f32(off + 8) as f64,
            );
        }
        triangles.push(corners);
    }

    // Weld at a scale well below f32 precision so only corners that were
    // identical in the file end up shared.
    Ok(Mesh::from_triangle_soup(&triangles, 1e-9))
}

/// Read a binary STL file into an indexed mesh.
pub fn read_stl<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let data = fs::read(path)?;
    read_stl_bytes(&data)
}

/// Facet normal: normalized cross product of the triangle's edges.
///
/// Degenerate (zero-area) triangles get the +Z unit normal instead of a
/// NaN vector; slicers treat the normal as advisory anyway.
fn facet_normal(tri: &[Point3; 3]) -> Vec3 {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    let len = n.norm();
    if len > 0.0 {
        n / len
    } else {
        Vec3::new(0.0, 0.0, 1.0)
    }
}
