//! Split execution — per-cell partitioning and part export.
//!
//! Cells are processed sequentially so progress reporting and the
//! cancellation check stay cell-granular, but each cell only reads the
//! shared input mesh and writes its own file, so nothing here depends on
//! processing order.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gridcut_clip::{clip_to_box, select_faces_in_box};
use gridcut_math::Tolerance;
use gridcut_mesh::Mesh;
use gridcut_stl::write_stl;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::plan::SplitPlan;

/// How a part was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartMethod {
    /// Exact clip-and-cap intersection; watertight if the input was.
    Clipped,
    /// Coarse whole-triangle selection; boundaries are not cut.
    Approximated,
}

/// Outcome of processing one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellOutcome {
    /// A part file was written.
    Exported {
        /// How the part geometry was produced.
        method: PartMethod,
        /// Triangles in the part.
        triangles: usize,
        /// Vertices in the part.
        vertices: usize,
    },
    /// The cell contained no geometry; nothing was written.
    EmptySkipped,
    /// Writing the part file failed; remaining cells still run.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

/// Per-cell status, in plan order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellStatus {
    /// 1-based part number from the plan.
    pub part_number: u32,
    /// What happened to this cell.
    pub outcome: CellOutcome,
}

/// Result of a split run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// Number of part files written.
    pub parts_created: usize,
    /// Outcome per processed cell. Shorter than the plan if cancelled.
    pub cells: Vec<CellStatus>,
}

/// Cooperative cancellation flag, checked between cells.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Parts already written stay on disk.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Receives per-cell progress; implemented by the presentation layer.
pub trait SplitObserver {
    /// Called after each cell, in part-number order.
    fn on_cell_processed(&self, part_number: u32, outcome: &CellOutcome) {
        let _ = (part_number, outcome);
    }
}

/// Observer that ignores all events.
pub struct NullObserver;

impl SplitObserver for NullObserver {}

/// Where and how to write parts.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory part files are written into (created if missing).
    pub output_dir: PathBuf,
    /// Stem for part file names: `{base}_part_{NN}.stl`, or `part_{NN}.stl`
    /// when empty.
    pub base_name: String,
    /// Skip exact clipping even for closed meshes.
    pub force_fallback: bool,
}

impl ExportOptions {
    /// Options writing `{base}_part_{NN}.stl` into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            force_fallback: false,
        }
    }

    fn part_file_name(&self, part_number: u32) -> String {
        if self.base_name.is_empty() {
            format!("part_{part_number:02}.stl")
        } else {
            format!("{}_part_{part_number:02}.stl", self.base_name)
        }
    }
}

/// Execute a split plan, writing one STL file per non-empty cell.
pub fn execute_split(mesh: &Mesh, plan: &SplitPlan, opts: &ExportOptions) -> Result<SplitReport> {
    execute_split_with(mesh, plan, opts, &CancelToken::new(), &NullObserver)
}

/// [`execute_split`] with an explicit cancellation token and observer.
///
/// Each cell is partitioned with the exact clipper when the input mesh is
/// closed (falling back to face selection if a cell's boundary cannot be
/// reconstructed), or with face selection directly when it is not. A
/// failed write is recorded and does not abort the remaining cells; the
/// run as a whole only fails when nothing at all was produced.
pub fn execute_split_with(
    mesh: &Mesh,
    plan: &SplitPlan,
    opts: &ExportOptions,
    cancel: &CancelToken,
    observer: &dyn SplitObserver,
) -> Result<SplitReport> {
    if mesh.vertices.is_empty() {
        return Err(SplitError::EmptyMesh);
    }

    let mut report = SplitReport {
        parts_created: 0,
        cells: Vec::with_capacity(plan.cells.len()),
    };

    // Single cell means the model already fits the envelope
    if plan.is_single_cell() {
        return Ok(report);
    }

    fs::create_dir_all(&opts.output_dir)?;

    let tol = Tolerance::for_model_scale(mesh.bounds().max_extent());
    let try_exact = !opts.force_fallback && mesh.is_closed();

    for cell in &plan.cells {
        if cancel.is_cancelled() {
            break;
        }

        let (part, method) = if try_exact {
            match clip_to_box(mesh, &cell.bounds, &tol) {
                Ok(part) => (part, PartMethod::Clipped),
                Err(_) => (
                    select_faces_in_box(mesh, &cell.bounds),
                    PartMethod::Approximated,
                ),
            }
        } else {
            (
                select_faces_in_box(mesh, &cell.bounds),
                PartMethod::Approximated,
            )
        };

        let outcome = if part.is_empty() {
            CellOutcome::EmptySkipped
        } else {
            let file_name = opts.part_file_name(cell.part_number);
            let header = format!("gridcut part {:02}", cell.part_number);
            match write_stl(opts.output_dir.join(file_name), &part, &header) {
                Ok(()) => {
                    report.parts_created += 1;
                    CellOutcome::Exported {
                        method,
                        triangles: part.triangle_count(),
                        vertices: part.vertex_count(),
                    }
                }
                Err(e) => CellOutcome::Failed {
                    reason: e.to_string(),
                },
            }
        };

        observer.on_cell_processed(cell.part_number, &outcome);
        report.cells.push(CellStatus {
            part_number: cell.part_number,
            outcome,
        });
    }

    if report.parts_created == 0 {
        return Err(SplitError::NoPartsCreated);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{plan_split, SplitLimits};
    use approx::assert_relative_eq;
    use gridcut_mesh::make_box;
    use gridcut_stl::read_stl;
    use std::sync::Mutex;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("gridcut-split-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn quad_split_plan(mesh: &Mesh) -> SplitPlan {
        plan_split(
            &mesh.bounds(),
            &SplitLimits { max_x: 60.0, max_y: 60.0, max_z: 1000.0 },
        )
        .unwrap()
    }

    #[test]
    fn test_cube_splits_into_four_watertight_parts() {
        let mesh = make_box(100.0, 100.0, 100.0);
        let plan = quad_split_plan(&mesh);
        let dir = scratch_dir("cube-quads");
        let report = execute_split(&mesh, &plan, &ExportOptions::new(&dir, "cube")).unwrap();

        assert_eq!(report.parts_created, 4);
        let mut total_volume = 0.0;
        for status in &report.cells {
            assert!(matches!(
                status.outcome,
                CellOutcome::Exported { method: PartMethod::Clipped, .. }
            ));
            let path = dir.join(format!("cube_part_{:02}.stl", status.part_number));
            let part = read_stl(&path).unwrap();
            assert!(part.is_closed());
            let volume = part.signed_volume();
            assert_relative_eq!(volume, 250_000.0, max_relative = 1e-3);
            total_volume += volume;
        }
        assert_relative_eq!(total_volume, 1_000_000.0, max_relative = 1e-3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fitting_model_creates_no_files() {
        let mesh = make_box(100.0, 100.0, 100.0);
        let plan = plan_split(
            &mesh.bounds(),
            &SplitLimits { max_x: 200.0, max_y: 200.0, max_z: 200.0 },
        )
        .unwrap();
        let dir = scratch_dir("no-split");
        let report = execute_split(&mesh, &plan, &ExportOptions::new(&dir, "cube")).unwrap();
        assert_eq!(report.parts_created, 0);
        assert!(report.cells.is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn test_open_mesh_uses_fallback() {
        let mut mesh = make_box(100.0, 100.0, 100.0);
        mesh.faces.pop(); // no longer closed
        let plan = quad_split_plan(&mesh);
        let dir = scratch_dir("fallback");
        let report = execute_split(&mesh, &plan, &ExportOptions::new(&dir, "open")).unwrap();
        assert!(report.parts_created > 0);
        for status in &report.cells {
            if let CellOutcome::Exported { method, .. } = &status.outcome {
                assert_eq!(*method, PartMethod::Approximated);
            }
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_force_fallback_skips_exact_clipping() {
        let mesh = make_box(100.0, 100.0, 100.0);
        let plan = quad_split_plan(&mesh);
        let dir = scratch_dir("forced");
        let mut opts = ExportOptions::new(&dir, "forced");
        opts.force_fallback = true;
        let report = execute_split(&mesh, &plan, &opts).unwrap();
        for status in &report.cells {
            if let CellOutcome::Exported { method, .. } = &status.outcome {
                assert_eq!(*method, PartMethod::Approximated);
            }
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_cells_are_skipped_not_fatal() {
        // Small cube in one corner of a wide grid: most cells are empty
        let mesh = make_box(10.0, 10.0, 10.0);
        // Stretch the planning bounds well past the geometry
        let mut bounds = mesh.bounds();
        bounds.max.x = 400.0;
        bounds.max.y = 400.0;
        let plan = plan_split(&bounds, &SplitLimits::default()).unwrap();
        assert_eq!(plan.cells.len(), 4);
        let dir = scratch_dir("sparse");
        let report = execute_split(&mesh, &plan, &ExportOptions::new(&dir, "slab")).unwrap();
        assert_eq!(report.parts_created, 1);
        let skipped = report
            .cells
            .iter()
            .filter(|s| s.outcome == CellOutcome::EmptySkipped)
            .count();
        assert_eq!(skipped, 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_mesh_is_fatal() {
        let mesh = Mesh::new();
        let plan = plan_split(
            &make_box(1.0, 1.0, 1.0).bounds(),
            &SplitLimits::default(),
        )
        .unwrap();
        let dir = scratch_dir("empty-mesh");
        let result = execute_split(&mesh, &plan, &ExportOptions::new(&dir, "x"));
        assert!(matches!(result, Err(SplitError::EmptyMesh)));
    }

    #[test]
    fn test_cancellation_stops_between_cells() {
        struct CancelAfterFirst {
            token: CancelToken,
            seen: Mutex<Vec<u32>>,
        }
        impl SplitObserver for CancelAfterFirst {
            fn on_cell_processed(&self, part_number: u32, _outcome: &CellOutcome) {
                self.seen.lock().unwrap().push(part_number);
                self.token.cancel();
            }
        }

        let mesh = make_box(100.0, 100.0, 100.0);
        let plan = quad_split_plan(&mesh);
        let dir = scratch_dir("cancel");
        let observer = CancelAfterFirst {
            token: CancelToken::new(),
            seen: Mutex::new(Vec::new()),
        };
        let report = execute_split_with(
            &mesh,
            &plan,
            &ExportOptions::new(&dir, "cancel"),
            &observer.token,
            &observer,
        )
        .unwrap();

        // Only the first cell ran; its part stays on disk
        assert_eq!(report.cells.len(), 1);
        assert_eq!(report.parts_created, 1);
        assert_eq!(*observer.seen.lock().unwrap(), vec![1]);
        assert!(dir.join("cancel_part_01.stl").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_part_file_names_are_zero_padded() {
        let opts = ExportOptions::new("out", "model");
        assert_eq!(opts.part_file_name(3), "model_part_03.stl");
        assert_eq!(opts.part_file_name(12), "model_part_12.stl");
        assert_eq!(opts.part_file_name(123), "model_part_123.stl");
        let bare = ExportOptions::new("out", "");
        assert_eq!(bare.part_file_name(7), "part_07.stl");
    }
}
