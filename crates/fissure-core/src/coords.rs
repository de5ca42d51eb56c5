//! Cell and query keys with a total order over their coordinates.
//!
//! Keys come verbatim from the input table, so equality is exact
//! (`f64::total_cmp`), not an epsilon comparison: two rows belong to the
//! same cell only when the upstream alignment step gave them identical
//! coordinates. The total order makes grouping and output order
//! deterministic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A grid sample site: one unique (latitude, longitude) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellKey {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl CellKey {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lat_deg
            .total_cmp(&other.lat_deg)
            .then(self.lon_deg.total_cmp(&other.lon_deg))
    }
}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {}, lon {}", self.lat_deg, self.lon_deg)
    }
}

/// One evaluation request: a cell plus the azimuth to evaluate at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueryKey {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub azimuth_deg: f64,
}

impl QueryKey {
    pub fn new(lat_deg: f64, lon_deg: f64, azimuth_deg: f64) -> Self {
        Self { lat_deg, lon_deg, azimuth_deg }
    }

    /// The cell this query addresses.
    pub fn cell(&self) -> CellKey {
        CellKey::new(self.lat_deg, self.lon_deg)
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueryKey {}

impl Ord for QueryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lat_deg
            .total_cmp(&other.lat_deg)
            .then(self.lon_deg.total_cmp(&other.lon_deg))
            .then(self.azimuth_deg.total_cmp(&other.azimuth_deg))
    }
}

impl PartialOrd for QueryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {}, lon {}, azimuth {}", self.lat_deg, self.lon_deg, self.azimuth_deg)
    }
}
