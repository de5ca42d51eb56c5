//! End-to-end orchestration: table records to cells, cells to curves,
//! curves to query results.
//!
//! Each cell's resolution touches nothing outside that cell, so the batch
//! step is a plain map over cells; with the `threading` feature it becomes
//! a rayon parallel map with no shared mutable state. Failures stay local
//! to their cell or query and are collected, never propagated.

use crate::cell::{build_cells, GridCell};
use crate::coords::{CellKey, QueryKey};
use crate::density::filtered_density;
use crate::error::{CellError, QueryError};
use crate::interp::{AzimuthInterpolator, Placement};
use crate::normalize::{DensityCurve, ProbabilityCurve};
use crate::table::{QueryRecord, ResultRow, StressRecord};
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "threading")]
use rayon::prelude::*;

/// Resolve one cell into its normalized probability curve.
///
/// Pure per-cell function: directions are resolved, the rising branch of
/// the stress sweep is kept as density, and the density is normalized by
/// its integral.
pub fn resolve_cell(cell: &GridCell) -> Result<ProbabilityCurve, CellError> {
    DensityCurve::from_points(filtered_density(cell)).normalize(cell.key())
}

#[cfg(feature = "threading")]
fn map_cells(cells: &[GridCell]) -> Vec<Result<ProbabilityCurve, CellError>> {
    cells.par_iter().map(resolve_cell).collect()
}

#[cfg(not(feature = "threading"))]
fn map_cells(cells: &[GridCell]) -> Vec<Result<ProbabilityCurve, CellError>> {
    cells.iter().map(resolve_cell).collect()
}

/// Resolve every cell, collecting curves and per-cell failures.
pub fn resolve_cells(
    cells: &[GridCell],
) -> (BTreeMap<CellKey, ProbabilityCurve>, Vec<CellError>) {
    let mut curves = BTreeMap::new();
    let mut failures = Vec::new();
    for result in map_cells(cells) {
        match result {
            Ok(curve) => {
                curves.insert(curve.key, curve);
            }
            Err(err) => {
                tracing::warn!(%err, "cell excluded from run");
                failures.push(err);
            }
        }
    }
    (curves, failures)
}

/// Evaluate queries against resolved curves.
///
/// Queries are grouped by unique (lat, lon, azimuth) triple, one
/// interpolation per triple, and answered in key order. A query whose cell
/// is unknown fails on its own without affecting the others.
pub fn evaluate_queries(
    curves: &BTreeMap<CellKey, ProbabilityCurve>,
    queries: &[QueryRecord],
) -> (Vec<ResultRow>, Vec<QueryError>) {
    let unique: BTreeSet<QueryKey> = queries.iter().map(|q| q.key()).collect();

    let mut interpolators: BTreeMap<CellKey, AzimuthInterpolator> = BTreeMap::new();
    let mut rows = Vec::with_capacity(unique.len());
    let mut failures = Vec::new();

    for key in unique {
        let cell_key = key.cell();
        let Some(curve) = curves.get(&cell_key) else {
            tracing::warn!("query ({key}) references an unknown cell");
            failures.push(QueryError::UnknownCell { key });
            continue;
        };
        let interp = interpolators
            .entry(cell_key)
            .or_insert_with(|| AzimuthInterpolator::new(curve));

        let eval = interp.evaluate(key.azimuth_deg);
        if eval.placement != Placement::Interior {
            tracing::debug!("query ({key}) outside the observed direction range; clamped flat");
        }
        rows.push(ResultRow {
            lat: key.lat_deg,
            lon: key.lon_deg,
            azimuth: key.azimuth_deg,
            probability: eval.probability,
        });
    }
    (rows, failures)
}

/// Everything one processing pass produces.
#[derive(Debug)]
pub struct RunOutput {
    /// One row per distinct query triple, in (lat, lon, azimuth) order.
    pub rows: Vec<ResultRow>,
    pub cell_failures: Vec<CellError>,
    pub query_failures: Vec<QueryError>,
}

/// Full pass: group records into cells, resolve curves, answer queries.
pub fn run(records: &[StressRecord], queries: &[QueryRecord]) -> RunOutput {
    let (cells, mut cell_failures) = build_cells(records);
    let (curves, resolve_failures) = resolve_cells(&cells);
    cell_failures.extend(resolve_failures);
    let (rows, query_failures) = evaluate_queries(&curves, queries);
    RunOutput { rows, cell_failures, query_failures }
}
