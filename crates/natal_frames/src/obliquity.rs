//! Obliquity of the ecliptic.
//!
//! Source: IAU 2006 precession (Capitaine, Wallace & Chapront 2003,
//! Eq. 39), also in IERS Conventions 2010, Eq. 5.40.

/// Mean obliquity at J2000.0 in degrees (84381.406″).
pub const OBLIQUITY_J2000_DEG: f64 = 84_381.406 / 3600.0;

/// Mean obliquity of date in arcseconds.
///
/// `t` is Julian centuries of TT since J2000.0.
pub fn mean_obliquity_arcsec(t: f64) -> f64 {
    84_381.406
        + t * (-46.836_769
            + t * (-0.000_183_1 + t * (0.002_003_40 + t * (-0.000_000_576 + t * -0.000_000_043_4))))
}

/// Mean obliquity of date in degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    mean_obliquity_arcsec(t) / 3600.0
}
