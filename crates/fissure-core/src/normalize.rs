//! Per-cell integral normalization of the filtered density.
//!
//! Integration runs over the NATIVE mean-motion order, not sorted by
//! direction. The path of integration is the physical measurement sweep,
//! which stops being monotonic in direction after resolution; summing the
//! signed trapezoids along that path and taking the absolute value is the
//! defined semantics, not an approximation of a sorted integral.

use crate::coords::CellKey;
use crate::density::DensityPoint;
use crate::error::CellError;
use serde::Serialize;

/// Trapezoidal integral of `y` over `x` along the slice order.
fn trapz_by<T>(points: &[T], x: impl Fn(&T) -> f64, y: impl Fn(&T) -> f64) -> f64 {
    points
        .windows(2)
        .map(|w| 0.5 * (y(&w[0]) + y(&w[1])) * (x(&w[1]) - x(&w[0])))
        .sum()
}

/// A cell's filtered density plus its integral over the sweep.
#[derive(Debug, Clone, Serialize)]
pub struct DensityCurve {
    /// Points in native mean-motion order.
    pub points: Vec<DensityPoint>,
    /// `|integral of pdf over crack direction|` along the sweep.
    pub area: f64,
}

impl DensityCurve {
    /// Integrate filtered points along the native sweep order.
    pub fn from_points(points: Vec<DensityPoint>) -> Self {
        let area = trapz_by(&points, |p| p.crack_dir_deg, |p| p.pdf).abs();
        Self { points, area }
    }

    /// Divide through by the area to obtain a true probability density.
    ///
    /// A zero area leaves probability undefined; the cell is reported as
    /// degenerate instead of letting a non-finite value through.
    pub fn normalize(self, key: CellKey) -> Result<ProbabilityCurve, CellError> {
        if self.area == 0.0 {
            return Err(CellError::Degenerate { key });
        }
        let area = self.area;
        let points = self
            .points
            .into_iter()
            .map(|p| ProbabilityPoint {
                crack_dir_deg: p.crack_dir_deg,
                pdf: p.pdf,
                probability: p.pdf / area,
            })
            .collect();
        Ok(ProbabilityCurve { key, points, area })
    }
}

/// One point of a normalized curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityPoint {
    pub crack_dir_deg: f64,
    pub pdf: f64,
    /// True density: `pdf / area`. Integrates to 1 over the cell.
    pub probability: f64,
}

/// A cell's normalized probability curve, still in native sweep order.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityCurve {
    pub key: CellKey,
    pub points: Vec<ProbabilityPoint>,
    pub area: f64,
}

impl ProbabilityCurve {
    /// Re-integrate `probability` along the sweep.
    ///
    /// Close to 1.0 for every well-formed cell; exposed as a diagnostic
    /// self-check and never called by the main pipeline.
    pub fn normalized_area(&self) -> f64 {
        trapz_by(&self.points, |p| p.crack_dir_deg, |p| p.probability).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points(pairs: &[(f64, f64)]) -> Vec<DensityPoint> {
        pairs.iter().map(|&(x, y)| DensityPoint { crack_dir_deg: x, pdf: y }).collect()
    }

    #[test]
    fn trapezoid_matches_a_known_ramp() {
        // y = x over [0, 10]: integral 50.
        let pts = points(&(0..=10).map(|i| (i as f64, i as f64)).collect::<Vec<_>>());
        let curve = DensityCurve::from_points(pts);
        assert_relative_eq!(curve.area, 50.0);
    }

    #[test]
    fn reversed_sweep_direction_still_gives_positive_area() {
        let forward = DensityCurve::from_points(points(&[(0.0, 1.0), (90.0, 1.0)]));
        let backward = DensityCurve::from_points(points(&[(90.0, 1.0), (0.0, 1.0)]));
        assert_relative_eq!(forward.area, 90.0);
        assert_relative_eq!(backward.area, 90.0);
    }

    #[test]
    fn zigzag_sweep_sums_signed_segments_before_the_absolute_value() {
        // 0 -> 90 -> 30: the backtrack cancels part of the forward segment.
        let curve = DensityCurve::from_points(points(&[(0.0, 1.0), (90.0, 1.0), (30.0, 1.0)]));
        assert_relative_eq!(curve.area, 30.0);
    }

    #[test]
    fn all_zero_density_is_degenerate() {
        let key = CellKey::new(1.0, 2.0);
        let curve = DensityCurve::from_points(points(&[(0.0, 0.0), (90.0, 0.0), (180.0, 0.0)]));
        assert_eq!(curve.area, 0.0);
        let err = curve.normalize(key).unwrap_err();
        assert_eq!(err, CellError::Degenerate { key });
    }

    #[test]
    fn normalized_curve_integrates_to_one() {
        let key = CellKey::new(0.0, 0.0);
        let pts = points(&(0..=180).map(|i| (i as f64, (i % 7) as f64)).collect::<Vec<_>>());
        let prob = DensityCurve::from_points(pts).normalize(key).expect("area is positive");
        assert_relative_eq!(prob.normalized_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn probability_is_pdf_over_area() {
        let key = CellKey::new(0.0, 0.0);
        let prob = DensityCurve::from_points(points(&[(0.0, 2.0), (10.0, 2.0)]))
            .normalize(key)
            .expect("area is positive");
        assert_relative_eq!(prob.area, 20.0);
        assert_relative_eq!(prob.points[0].probability, 0.1);
        assert_relative_eq!(prob.points[1].probability, 0.1);
    }
}
