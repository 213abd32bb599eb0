//! gridcut CLI — split STL models into parts that fit a build volume.
//!
//! Two operations: `info` prints model statistics as fixed `KEY:VALUE`
//! lines for machine consumption, and `split` writes one STL per
//! non-empty grid cell, exiting zero only when at least one part was
//! created.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridcut_split::{
    compute_info, execute_split_with, oriented_bounds, plan_split, CancelToken, CellOutcome,
    ExportOptions, PartMethod, SplitLimits, SplitObserver,
};
use gridcut_stl::read_stl;

#[derive(Parser)]
#[command(name = "gridcut")]
#[command(about = "Split STL models into a grid of printable parts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print model statistics as KEY:VALUE lines
    Info {
        /// Input binary STL file
        file: PathBuf,
        /// Apply the 180° X-axis flip before measuring (true/false)
        #[arg(default_value_t = false)]
        flip: bool,
    },
    /// Split a model into parts fitting the given envelope
    Split {
        /// Input binary STL file
        input: PathBuf,
        /// Maximum part extent along X (<= 0 disables splitting on X)
        max_x: f64,
        /// Maximum part extent along Y (<= 0 disables splitting on Y)
        max_y: f64,
        /// Maximum part extent along Z (accepted but never divided)
        max_z: f64,
        /// Apply the 180° X-axis flip before splitting (true/false)
        flip: bool,
        /// Directory to write part files into
        output_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Info { file, flip } => show_info(&file, flip),
        Commands::Split {
            input,
            max_x,
            max_y,
            max_z,
            flip,
            output_dir,
        } => run_split(&input, max_x, max_y, max_z, flip, &output_dir),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(file: &Path, flip: bool) -> Result<ExitCode> {
    let mut mesh = match read_stl(file) {
        Ok(mesh) => mesh,
        Err(e) => {
            println!("ERROR:{e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    oriented_bounds(&mut mesh, flip)?;
    let info = compute_info(&mesh)?;

    println!("TRIANGLES:{}", info.triangles);
    println!("VERTICES:{}", info.vertices);
    println!("WATERTIGHT:{}", info.watertight);
    println!("VOLUME:{:.2}", info.volume);
    println!("DIMENSIONS:{}", info.dimensions());
    println!("WIDTH:{:.1}", info.width);
    println!("DEPTH:{:.1}", info.depth);
    println!("HEIGHT:{:.1}", info.height);
    Ok(ExitCode::SUCCESS)
}

/// Prints one progress line per processed cell.
struct ConsoleObserver;

impl SplitObserver for ConsoleObserver {
    fn on_cell_processed(&self, part_number: u32, outcome: &CellOutcome) {
        match outcome {
            CellOutcome::Exported {
                method,
                triangles,
                vertices,
            } => {
                let how = match method {
                    PartMethod::Clipped => "clipped",
                    PartMethod::Approximated => "approximate",
                };
                println!(
                    "part {part_number:02}: exported ({how}, {triangles} triangles, {vertices} vertices)"
                );
            }
            CellOutcome::EmptySkipped => {
                println!("part {part_number:02}: no geometry in bounds - skipped");
            }
            CellOutcome::Failed { reason } => {
                println!("part {part_number:02}: FAILED - {reason}");
            }
        }
    }
}

fn run_split(
    input: &Path,
    max_x: f64,
    max_y: f64,
    max_z: f64,
    flip: bool,
    output_dir: &Path,
) -> Result<ExitCode> {
    let mut mesh = read_stl(input)
        .with_context(|| format!("failed to load {}", input.display()))?;

    let info = compute_info(&mesh)?;
    println!(
        "loaded {} triangles, {} vertices, watertight: {}",
        info.triangles, info.vertices, info.watertight
    );
    if !info.watertight {
        println!("model is not watertight - parts will use approximate selection");
    }

    let bounds = oriented_bounds(&mut mesh, flip)?;
    let limits = SplitLimits { max_x, max_y, max_z };
    let plan = plan_split(&bounds, &limits)?;

    if plan.is_single_cell() {
        println!("model fits the build volume - no splitting required");
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "split configuration: {}x{} = {} parts",
        plan.count_x,
        plan.count_y,
        plan.part_count()
    );

    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let opts = ExportOptions::new(output_dir, base);
    let report = execute_split_with(&mesh, &plan, &opts, &CancelToken::new(), &ConsoleObserver)
        .context("split failed")?;

    println!(
        "completed: {} parts created in {}",
        report.parts_created,
        output_dir.display()
    );
    Ok(ExitCode::SUCCESS)
}
