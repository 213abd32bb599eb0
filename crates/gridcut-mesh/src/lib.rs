#![warn(missing_docs)]

//! Indexed triangle mesh and bounding-box types for the gridcut splitter.
//!
//! This crate owns the data model everything else operates on:
//! [`Mesh`] (vertex table + index triples, f64 geometry), [`Aabb3`]
//! (min/max box, inverted boxes denote "no geometry"), and the derived
//! properties the splitter reports: bounds, signed volume, and the
//! closedness flag that decides whether exact clipping is attempted.

pub mod aabb;
pub mod error;
pub mod mesh;

pub use aabb::Aabb3;
pub use error::{MeshError, Result};
pub use mesh::{make_box, Mesh};
