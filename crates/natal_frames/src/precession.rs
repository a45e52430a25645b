//! Precession of the equinox along the ecliptic.
//!
//! The analytic theories return longitudes on the J2000 ecliptic; charts
//! are cast against the equinox of date. The accumulated shift p_A is the
//! IAU 2006 polynomial (Capitaine, Wallace & Chapront 2003, Table 1).

const P_A_ARCSEC: [f64; 5] = [5028.796195, 1.1054348, 0.00007964, -0.000023857, -0.0000000383];

/// Accumulated precession in longitude, arcseconds, `t` in Julian
/// centuries of TT from J2000.
pub fn general_precession_longitude_arcsec(t: f64) -> f64 {
    P_A_ARCSEC.iter().rev().fold(0.0, |acc, c| (acc + c) * t)
}

pub fn general_precession_longitude_deg(t: f64) -> f64 {
    general_precession_longitude_arcsec(t) / 3600.0
}

/// Shift a J2000 ecliptic longitude onto the mean equinox of date.
///
/// The slow tilt of the ecliptic plane is neglected.
pub fn precess_longitude_deg(lon_j2000_deg: f64, t: f64) -> f64 {
    crate::normalize_deg(lon_j2000_deg + general_precession_longitude_deg(t))
}
