//! Dense per-cell sample storage.
//!
//! A `GridCell` owns exactly one sample per integer degree of mean motion.
//! The fixed 360-slot layout is what makes the circular differencing in
//! [`crate::density`] well defined: slot 0's predecessor is slot 359 of the
//! same cell, never a neighbouring cell's data. Anything other than a dense,
//! duplicate-free sweep is rejected at construction.

use crate::coords::CellKey;
use crate::direction::crack_direction;
use crate::error::{CellError, MalformedCell};
use crate::table::StressRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Samples per grid cell: one per integer degree of mean motion.
pub const SAMPLES_PER_CELL: usize = 360;

/// One stress observation, immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observed stress azimuth, clockwise convention.
    pub stress_azimuth_deg: f64,
    pub sig_theta_kpa: f64,
    pub sig_phi_kpa: f64,
}

impl Sample {
    /// Larger of the two principal stresses.
    pub fn max_stress(&self) -> f64 {
        self.sig_theta_kpa.max(self.sig_phi_kpa)
    }

    /// Crack direction for this observation, counter-clockwise degrees.
    pub fn crack_direction_deg(&self) -> f64 {
        crack_direction(self.stress_azimuth_deg, self.sig_theta_kpa, self.sig_phi_kpa)
    }
}

/// A grid cell: 360 samples indexed by mean-motion degree.
#[derive(Debug, Clone)]
pub struct GridCell {
    key: CellKey,
    /// len == SAMPLES_PER_CELL; index is the mean-motion degree.
    samples: Vec<Sample>,
}

impl GridCell {
    /// Assemble a cell from (mean-motion degree, sample) pairs.
    ///
    /// Every degree in 0..360 must appear exactly once; anything else is a
    /// [`CellError::Malformed`] for this cell.
    pub fn from_indexed_samples(
        key: CellKey,
        indexed: impl IntoIterator<Item = (u32, Sample)>,
    ) -> Result<Self, CellError> {
        let mut slots: Vec<Option<Sample>> = vec![None; SAMPLES_PER_CELL];
        let mut present = 0usize;

        for (degree, sample) in indexed {
            let slot = slots.get_mut(degree as usize).ok_or(CellError::Malformed {
                key,
                reason: MalformedCell::DegreeOutOfRange(degree),
            })?;
            if slot.is_some() {
                return Err(CellError::Malformed {
                    key,
                    reason: MalformedCell::DuplicateDegree(degree),
                });
            }
            *slot = Some(sample);
            present += 1;
        }

        if present != SAMPLES_PER_CELL {
            return Err(CellError::Malformed {
                key,
                reason: MalformedCell::IncompleteSweep { present },
            });
        }

        Ok(Self { key, samples: slots.into_iter().flatten().collect() })
    }

    pub fn key(&self) -> CellKey {
        self.key
    }

    /// Samples in native mean-motion order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

/// Group table records into cells, collecting per-cell failures.
///
/// Well-formed cells come back key-sorted; a malformed (lat, lon) group is
/// reported and excluded without aborting the rest of the run.
pub fn build_cells(records: &[StressRecord]) -> (Vec<GridCell>, Vec<CellError>) {
    let mut grouped: BTreeMap<CellKey, Vec<(u32, Sample)>> = BTreeMap::new();
    for rec in records {
        grouped.entry(rec.cell_key()).or_default().push((
            rec.mean_motion_deg,
            Sample {
                stress_azimuth_deg: rec.stress_azimuth_deg,
                sig_theta_kpa: rec.sig_theta_kpa,
                sig_phi_kpa: rec.sig_phi_kpa,
            },
        ));
    }

    let mut cells = Vec::with_capacity(grouped.len());
    let mut failures = Vec::new();
    for (key, indexed) in grouped {
        match GridCell::from_indexed_samples(key, indexed) {
            Ok(cell) => cells.push(cell),
            Err(err) => failures.push(err),
        }
    }
    (cells, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64, degree: u32) -> StressRecord {
        StressRecord {
            lat_deg: lat,
            lon_deg: lon,
            mean_motion_deg: degree,
            stress_azimuth_deg: degree as f64,
            sig_theta_kpa: 10.0,
            sig_phi_kpa: 5.0,
        }
    }

    fn full_sweep(lat: f64, lon: f64) -> Vec<StressRecord> {
        (0..SAMPLES_PER_CELL as u32).map(|d| record(lat, lon, d)).collect()
    }

    #[test]
    fn full_sweep_builds_a_cell() {
        let (cells, failures) = build_cells(&full_sweep(1.0, 2.0));
        assert!(failures.is_empty(), "unexpected failures: {failures:?}");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].key(), CellKey::new(1.0, 2.0));
        assert_eq!(cells[0].samples().len(), SAMPLES_PER_CELL);
        // Slot index is the mean-motion degree, which here tracks azimuth.
        assert_eq!(cells[0].samples()[5].stress_azimuth_deg, 5.0);
    }

    #[test]
    fn missing_degree_is_malformed() {
        let mut records = full_sweep(1.0, 2.0);
        records.remove(100);
        let (cells, failures) = build_cells(&records);
        assert!(cells.is_empty());
        assert_eq!(
            failures,
            vec![CellError::Malformed {
                key: CellKey::new(1.0, 2.0),
                reason: MalformedCell::IncompleteSweep { present: 359 },
            }]
        );
    }

    #[test]
    fn duplicate_degree_is_malformed() {
        let mut records = full_sweep(1.0, 2.0);
        records[100].mean_motion_deg = 99;
        let (cells, failures) = build_cells(&records);
        assert!(cells.is_empty());
        assert_eq!(
            failures,
            vec![CellError::Malformed {
                key: CellKey::new(1.0, 2.0),
                reason: MalformedCell::DuplicateDegree(99),
            }]
        );
    }

    #[test]
    fn degree_out_of_range_is_malformed() {
        let mut records = full_sweep(1.0, 2.0);
        records[0].mean_motion_deg = 360;
        let (cells, failures) = build_cells(&records);
        assert!(cells.is_empty());
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0],
            CellError::Malformed { reason: MalformedCell::DegreeOutOfRange(360), .. }
        ));
    }

    #[test]
    fn malformed_cell_does_not_take_down_its_neighbours() {
        let mut records = full_sweep(1.0, 2.0);
        let mut truncated = full_sweep(3.0, 4.0);
        truncated.truncate(200);
        records.extend(truncated);

        let (cells, failures) = build_cells(&records);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].key(), CellKey::new(1.0, 2.0));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].key(), CellKey::new(3.0, 4.0));
    }

    #[test]
    fn cells_come_back_key_sorted() {
        let mut records = full_sweep(10.0, 0.0);
        records.extend(full_sweep(-10.0, 0.0));
        let (cells, _) = build_cells(&records);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].key(), CellKey::new(-10.0, 0.0));
        assert_eq!(cells[1].key(), CellKey::new(10.0, 0.0));
    }
}
