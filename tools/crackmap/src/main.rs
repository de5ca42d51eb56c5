//! Batch evaluation CLI: stress table + query list in, probability table out.
//!
//! Upstream tooling aligns and cleans the raw survey files; this tool
//! consumes the already-clean tables, runs the engine, and writes one row
//! per distinct query triple.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fissure_core::{run, QueryRecord, StressRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "crackmap", about = "Evaluate crack-direction probabilities at query azimuths")]
struct Args {
    /// Aligned stress table CSV: lat_deg, lon_deg, mean_motion_deg,
    /// stress_azimuth_deg, sig_theta_kpa, sig_phi_kpa.
    #[arg(short, long)]
    stress: PathBuf,

    /// Query CSV: lat_deg, lon_deg, azimuth_deg.
    #[arg(short, long)]
    queries: PathBuf,

    /// Output CSV path (lat, lon, azimuth, probability); stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat any malformed/degenerate cell or unknown-cell query as fatal.
    #[arg(long)]
    strict: bool,
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let records: Vec<StressRecord> = read_table(&args.stress)?;
    let queries: Vec<QueryRecord> = read_table(&args.queries)?;
    eprintln!("Loaded {} stress rows, {} query rows.", records.len(), queries.len());

    let out = run(&records, &queries);

    for err in &out.cell_failures {
        eprintln!("Warning: {err}");
    }
    for err in &out.query_failures {
        eprintln!("Warning: {err}");
    }
    if args.strict && (!out.cell_failures.is_empty() || !out.query_failures.is_empty()) {
        bail!(
            "strict mode: {} cell and {} query failures",
            out.cell_failures.len(),
            out.query_failures.len()
        );
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    for row in &out.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    eprintln!("Wrote {} result rows.", out.rows.len());
    Ok(())
}
