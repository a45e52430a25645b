//! Earth Rotation Angle, Greenwich Mean Sidereal Time and local sidereal time.
//!
//! The house solver needs the sidereal time at the observer's meridian
//! (RAMC). UT1 is approximated by UTC; the difference stays below 0.9 s,
//! about 0.004° of sidereal rotation.
//!
//! Sources:
//! - ERA: IERS Conventions 2010, Eq. 5.15.
//! - GMST polynomial: Capitaine et al. 2003, Table 2.

use crate::julian::{DAYS_PER_CENTURY, J2000_JD};

/// Earth Rotation Angle in degrees, [0, 360).
///
/// θ = 360° × (0.7790572732640 + 1.00273781191135448 × Du),
/// Du = JD_UT1 − 2451545.0.
pub fn earth_rotation_angle_deg(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    // Split off whole days so the fractional turn keeps full precision.
    let turns = 0.779_057_273_264_0 + 0.002_737_811_911_354_48 * du + du.fract();
    (360.0 * turns).rem_euclid(360.0)
}

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
///
/// GMST = ERA + (0.014506 + 4612.156534 T + 1.3915817 T² − 0.00000044 T³
/// − 0.000029956 T⁴ − 0.0000000368 T⁵)″
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = (jd_ut - J2000_JD) / DAYS_PER_CENTURY;
    let poly_arcsec = 0.014506
        + t * (4612.156534
            + t * (1.3915817 + t * (-0.00000044 + t * (-0.000029956 + t * -0.0000000368))));
    (earth_rotation_angle_deg(jd_ut) + poly_arcsec / 3600.0).rem_euclid(360.0)
}

/// Local sidereal time in degrees, [0, 360), for an east-positive longitude.
pub fn local_sidereal_time_deg(gmst_deg: f64, longitude_east_deg: f64) -> f64 {
    (gmst_deg + longitude_east_deg).rem_euclid(360.0)
}
