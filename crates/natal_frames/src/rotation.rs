//! Rotations between the equatorial and ecliptic frames.
//!
//! The frames share the equinox direction and differ by a tilt of ε, the
//! obliquity, about it. Pass the obliquity of date for frames of date.

use crate::normalize_deg;

/// Ecliptic (λ, β) → equatorial (α, δ), all in degrees.
///
/// α is returned in [0, 360).
pub fn ecliptic_to_equatorial_deg(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let (sl, cl) = lon_deg.to_radians().sin_cos();
    let (sb, cb) = lat_deg.to_radians().sin_cos();
    let (se, ce) = obliquity_deg.to_radians().sin_cos();
    let ra = (sl * ce * cb - sb * se).atan2(cl * cb);
    let dec = (sb * ce + cb * se * sl).clamp(-1.0, 1.0).asin();
    (normalize_deg(ra.to_degrees()), dec.to_degrees())
}

/// Equatorial (α, δ) → ecliptic (λ, β), all in degrees.
///
/// λ is returned in [0, 360).
pub fn equatorial_to_ecliptic_deg(ra_deg: f64, dec_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let (sa, ca) = ra_deg.to_radians().sin_cos();
    let (sd, cd) = dec_deg.to_radians().sin_cos();
    let (se, ce) = obliquity_deg.to_radians().sin_cos();
    let lon = (sa * ce * cd + sd * se).atan2(ca * cd);
    let lat = (sd * ce - cd * se * sa).clamp(-1.0, 1.0).asin();
    (normalize_deg(lon.to_degrees()), lat.to_degrees())
}
