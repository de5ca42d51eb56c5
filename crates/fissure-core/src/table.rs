//! Row types at the seam with the ingest collaborator.
//!
//! The upstream tooling is responsible for aligning and cleaning the raw
//! survey files; what arrives here is already a flat table of per-sample
//! records plus a list of query triples.

use crate::coords::{CellKey, QueryKey};
use serde::{Deserialize, Serialize};

/// One row of the aligned stress table: a single mean-motion degree of one
/// grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressRecord {
    pub lat_deg: f64,
    pub lon_deg: f64,
    /// Integer degree of mean motion, 0-359; the cell's native ordering.
    pub mean_motion_deg: u32,
    /// Observed stress azimuth, clockwise convention.
    pub stress_azimuth_deg: f64,
    pub sig_theta_kpa: f64,
    pub sig_phi_kpa: f64,
}

impl StressRecord {
    /// The cell this row belongs to.
    pub fn cell_key(&self) -> CellKey {
        CellKey::new(self.lat_deg, self.lon_deg)
    }
}

/// One evaluation request row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub lat_deg: f64,
    pub lon_deg: f64,
    /// Azimuth to evaluate the probability curve at.
    pub azimuth_deg: f64,
}

impl QueryRecord {
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.lat_deg, self.lon_deg, self.azimuth_deg)
    }
}

/// One row of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub lat: f64,
    pub lon: f64,
    pub azimuth: f64,
    pub probability: f64,
}
