//! Circular stress filtering: the rising branch of a cell's max-stress
//! sweep becomes its unnormalized crack-direction density.

use crate::cell::{GridCell, SAMPLES_PER_CELL};
use serde::Serialize;

/// One point of a cell's unnormalized density curve, in mean-motion order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    /// Resolved crack direction, counter-clockwise degrees.
    pub crack_dir_deg: f64,
    /// Unnormalized density: the sample's max stress, or zero where the
    /// stress sweep is falling or negative.
    pub pdf: f64,
}

/// Compute the filtered density for one cell.
///
/// The first difference of max stress is circular within the cell: slot 0
/// compares against slot 359 of the same sweep. Density starts as the max
/// stress itself and is zeroed where the difference is negative (falling
/// branch) and, independently, where the stress itself is negative. Both
/// rules can fire on the same slot; either alone zeroes it.
pub fn filtered_density(cell: &GridCell) -> Vec<DensityPoint> {
    let samples = cell.samples();
    debug_assert_eq!(samples.len(), SAMPLES_PER_CELL);

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let prev = &samples[(i + SAMPLES_PER_CELL - 1) % SAMPLES_PER_CELL];
            let max_stress = sample.max_stress();
            let diff = max_stress - prev.max_stress();

            let mut pdf = max_stress;
            if diff < 0.0 {
                pdf = 0.0;
            }
            if max_stress < 0.0 {
                pdf = 0.0;
            }

            DensityPoint { crack_dir_deg: sample.crack_direction_deg(), pdf }
        })
        .collect()
}
