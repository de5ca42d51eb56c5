//! Normalization diagnostic: every well-formed cell's probability curve
//! should re-integrate to 1.0 over its native sweep. This re-runs that
//! integral outside the main pipeline and reports any cell drifting past
//! the tolerance.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fissure_core::{build_cells, resolve_cells, StressRecord};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "normcheck", about = "Verify per-cell probability curves integrate to 1.0")]
struct Args {
    /// Aligned stress table CSV.
    #[arg(short, long)]
    stress: PathBuf,

    /// Maximum allowed |integral - 1.0| per cell.
    #[arg(short, long, default_value_t = 1e-6)]
    tolerance: f64,

    /// Optional JSON report path.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct CellCheck {
    lat_deg: f64,
    lon_deg: f64,
    integral: f64,
    deviation: f64,
}

#[derive(Serialize)]
struct Report {
    n_cells: usize,
    n_failed_cells: usize,
    n_out_of_tolerance: usize,
    max_deviation: f64,
    cells: Vec<CellCheck>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut reader = csv::Reader::from_path(&args.stress)
        .with_context(|| format!("opening {}", args.stress.display()))?;
    let records: Vec<StressRecord> = reader
        .deserialize()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing {}", args.stress.display()))?;

    let (cells, build_failures) = build_cells(&records);
    let (curves, resolve_failures) = resolve_cells(&cells);
    let n_failed_cells = build_failures.len() + resolve_failures.len();
    for err in build_failures.iter().map(|e| e.to_string())
        .chain(resolve_failures.iter().map(|e| e.to_string()))
    {
        eprintln!("Warning: {err}");
    }

    eprintln!("\n{:<14} {:<14} {:>14} {:>12}", "Lat", "Lon", "Integral", "Deviation");
    eprintln!("{}", "-".repeat(58));

    let mut checks = Vec::with_capacity(curves.len());
    let mut n_out = 0usize;
    let mut max_deviation = 0.0f64;
    for curve in curves.values() {
        let integral = curve.normalized_area();
        let deviation = (integral - 1.0).abs();
        max_deviation = max_deviation.max(deviation);
        let flag = if deviation > args.tolerance { "  <-- out of tolerance" } else { "" };
        if deviation > args.tolerance {
            n_out += 1;
        }
        eprintln!(
            "{:<14} {:<14} {:>14.9} {:>12.3e}{flag}",
            curve.key.lat_deg, curve.key.lon_deg, integral, deviation
        );
        checks.push(CellCheck {
            lat_deg: curve.key.lat_deg,
            lon_deg: curve.key.lon_deg,
            integral,
            deviation,
        });
    }

    let report = Report {
        n_cells: checks.len(),
        n_failed_cells,
        n_out_of_tolerance: n_out,
        max_deviation,
        cells: checks,
    };
    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("\nReport written to {}.", path.display());
    }

    eprintln!(
        "\n{} cells checked, {} skipped, max deviation {:.3e}.",
        report.n_cells, report.n_failed_cells, report.max_deviation
    );
    if n_out > 0 {
        bail!("{n_out} cells integrate outside tolerance {:e}", args.tolerance);
    }
    Ok(())
}
