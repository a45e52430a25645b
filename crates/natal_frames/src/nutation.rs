//! Low-precision nutation in longitude and obliquity.
//!
//! Four leading lunisolar terms, good to about 0.5″ in Δψ and 0.1″ in Δε.
//! Source: Meeus, *Astronomical Algorithms* (2nd ed.), Chapter 22.

/// Nutation `(Δψ, Δε)` in arcseconds.
///
/// `t` = Julian centuries of TT since J2000.0.
pub fn nutation_arcsec(t: f64) -> (f64, f64) {
    // Mean longitudes of the Sun and Moon, and the Moon's ascending node.
    let l_sun = (280.4665 + 36_000.7698 * t).to_radians();
    let l_moon = (218.3165 + 481_267.8813 * t).to_radians();
    let node = (125.044_52 - 1934.136_261 * t).to_radians();

    let dpsi = -17.20 * node.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * node).sin();
    let deps = 9.20 * node.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * node).cos();
    (dpsi, deps)
}

/// Nutation in longitude, degrees.
pub fn nutation_longitude_deg(t: f64) -> f64 {
    nutation_arcsec(t).0 / 3600.0
}
