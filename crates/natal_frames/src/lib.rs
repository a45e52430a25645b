//! Frame helpers for chart computations.
//!
//! Obliquity of the ecliptic, low-precision nutation, general precession
//! in longitude, and conversions between the coordinate forms the chart
//! code passes around.

pub mod nutation;
pub mod obliquity;
pub mod precession;
pub mod rotation;
pub mod spherical;

pub use nutation::{nutation_arcsec, nutation_longitude_deg};
pub use obliquity::{OBLIQUITY_J2000_DEG, mean_obliquity_deg};
pub use precession::{
    general_precession_longitude_arcsec, general_precession_longitude_deg, precess_longitude_deg,
};
pub use rotation::{ecliptic_to_equatorial_deg, equatorial_to_ecliptic_deg};
pub use spherical::{SphericalCoords, cartesian_to_spherical, spherical_to_cartesian};

/// Normalize an angle in degrees to [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed difference `a − b` reduced to (−180, 180].
pub fn signed_diff_deg(a: f64, b: f64) -> f64 {
    let d = normalize_deg(a - b);
    if d > 180.0 { d - 360.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps() {
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(725.0), 5.0);
        assert!(normalize_deg(-1e-17) < 360.0);
    }

    #[test]
    fn signed_diff_takes_short_way() {
        assert_eq!(signed_diff_deg(10.0, 350.0), 20.0);
        assert_eq!(signed_diff_deg(350.0, 10.0), -20.0);
        assert_eq!(signed_diff_deg(180.0, 0.0), 180.0);
    }
}
