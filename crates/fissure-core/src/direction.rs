//! Crack-direction resolution from principal stresses.
//!
//! The survey reports stress azimuth in a clockwise convention while crack
//! directions are counter-clockwise, so the azimuth is mirrored first. The
//! dominant principal stress then selects the branch:
//!
//!   sig_phi dominant:   crack opens along the mirrored azimuth, folded
//!                       into a half turn
//!   sig_theta dominant: crack opens perpendicular to it
//!
//! A tie counts as sig_phi dominating.

/// Resolve the crack direction (counter-clockwise degrees, in [0, 180)) for
/// one observation.
///
/// The remainder is Euclidean, so the result stays non-negative for any real
/// azimuth, including values outside [0, 360).
pub fn crack_direction(stress_azimuth_deg: f64, sig_theta_kpa: f64, sig_phi_kpa: f64) -> f64 {
    let ccw_azimuth = 360.0 - stress_azimuth_deg;
    let max_stress = sig_theta_kpa.max(sig_phi_kpa);
    if max_stress == sig_phi_kpa {
        ccw_azimuth.rem_euclid(180.0)
    } else {
        (ccw_azimuth + 90.0).rem_euclid(180.0)
    }
}
