//! Split planning — turning model bounds and envelope limits into a grid
//! of cell boxes.
//!
//! Only X and Y are ever divided; every part spans the full model height.
//! Splitting height is not useful for the target manufacturing workflow,
//! so `count_z` is fixed at 1.

use gridcut_math::Point3;
use gridcut_mesh::Aabb3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// Working-envelope limits, e.g. a printer's build volume in mm.
///
/// A zero or negative limit disables splitting on that axis. `max_z` is
/// accepted for interface symmetry but never used to split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitLimits {
    /// Maximum part extent along X.
    pub max_x: f64,
    /// Maximum part extent along Y.
    pub max_y: f64,
    /// Maximum part extent along Z (unused: height is never divided).
    pub max_z: f64,
}

impl Default for SplitLimits {
    fn default() -> Self {
        // Ender 3 build volume
        Self {
            max_x: 220.0,
            max_y: 220.0,
            max_z: 250.0,
        }
    }
}

impl SplitLimits {
    /// Reject NaN or infinite limits.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("max_x", self.max_x), ("max_y", self.max_y), ("max_z", self.max_z)] {
            if !v.is_finite() {
                return Err(SplitError::InvalidLimits(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

/// One cell of the split grid.
#[derive(Debug, Clone)]
pub struct Cell {
    /// The cell's box. Z range always equals the full model Z range.
    pub bounds: Aabb3,
    /// Grid position `(i, j)` along X and Y.
    pub index: (u32, u32),
    /// 1-based sequential part number, assigned in enumeration order.
    pub part_number: u32,
}

/// An ordered grid of cells tiling the model bounding box.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// Number of divisions along X.
    pub count_x: u32,
    /// Number of divisions along Y.
    pub count_y: u32,
    /// Cells in row-major order (`i` over X outer, `j` over Y inner).
    pub cells: Vec<Cell>,
}

impl SplitPlan {
    /// True if the model fits the envelope — a single cell equal to the
    /// full bounding box, meaning no split is required.
    pub fn is_single_cell(&self) -> bool {
        self.cells.len() == 1
    }

    /// Total number of cells.
    pub fn part_count(&self) -> usize {
        self.cells.len()
    }
}

/// Divisions required to bring `extent` under `max`; 1 when `max` is
/// unset (zero or negative).
fn axis_count(extent: f64, max: f64) -> u32 {
    if max <= 0.0 {
        return 1;
    }
    ((extent / max).ceil() as u32).max(1)
}

/// Plan a split of `bounds` under the given envelope limits.
///
/// Cells subdivide X and Y into equal-width intervals: if the extent is
/// not an exact multiple of the limit, cells come out smaller than the
/// limit rather than leaving one odd-sized remainder cell. Boundaries are
/// computed as `min + extent * k / count` so the grid endpoints are exact
/// and adjacent cells share their boundary coordinate.
pub fn plan_split(bounds: &Aabb3, limits: &SplitLimits) -> Result<SplitPlan> {
    limits.validate()?;

    let extents = bounds.extents();
    let count_x = axis_count(extents.x, limits.max_x);
    let count_y = axis_count(extents.y, limits.max_y);

    let x_at = |k: u32| {
        if k == count_x {
            bounds.max.x
        } else {
            bounds.min.x + extents.x * k as f64 / count_x as f64
        }
    };
    let y_at = |k: u32| {
        if k == count_y {
            bounds.max.y
        } else {
            bounds.min.y + extents.y * k as f64 / count_y as f64
        }
    };

    let mut cells = Vec::with_capacity((count_x * count_y) as usize);
    let mut part_number = 1;
    for i in 0..count_x {
        for j in 0..count_y {
            cells.push(Cell {
                bounds: Aabb3::new(
                    Point3::new(x_at(i), y_at(j), bounds.min.z),
                    Point3::new(x_at(i + 1), y_at(j + 1), bounds.max.z),
                ),
                index: (i, j),
                part_number,
            });
            part_number += 1;
        }
    }

    Ok(SplitPlan {
        count_x,
        count_y,
        cells,
    })
}
