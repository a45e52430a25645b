//! Geocentric Sun, low-precision theory.
//!
//! Meeus, *Astronomical Algorithms* (2nd ed.), Chapter 25. Accuracy is
//! about 0.01° in longitude, which is well inside chart tolerances.

use natal_frames::{SphericalCoords, normalize_deg};

/// Apparent geocentric ecliptic position of the Sun, equinox of date.
///
/// `t` = Julian centuries of TT since J2000.0. Latitude is taken as zero.
/// Distance is in AU.
pub fn sun_apparent(t: f64) -> SphericalCoords {
    let mean_lon = 280.466_46 + t * (36_000.769_83 + t * 0.000_303_2);
    let mean_anomaly = 357.529_11 + t * (35_999.050_29 - t * 0.000_153_7);
    let e = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);

    let m = mean_anomaly.to_radians();
    let center = (1.914_602 - t * (0.004_817 + t * 0.000_014)) * m.sin()
        + (0.019_993 - t * 0.000_101) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();

    let true_lon = mean_lon + center;
    let true_anomaly = (mean_anomaly + center).to_radians();
    let radius = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

    // Aberration and the dominant nutation term.
    let omega = (125.04 - 1934.136 * t).to_radians();
    let apparent = true_lon - 0.005_69 - 0.004_78 * omega.sin();

    SphericalCoords {
        lon_deg: normalize_deg(apparent),
        lat_deg: 0.0,
        distance: radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natal_time::jd_to_centuries;

    #[test]
    fn meeus_example_25a() {
        // 1992 Oct 13.0 TD: λ = 199.90895°, R = 0.99766 AU
        let s = sun_apparent(jd_to_centuries(2_448_908.5));
        assert!((s.lon_deg - 199.908_95).abs() < 0.001, "λ = {}", s.lon_deg);
        assert!((s.distance - 0.997_66).abs() < 0.0001, "R = {}", s.distance);
    }

    #[test]
    fn december_solstice_2023() {
        // 2023 Dec 22 03:27 UTC
        let s = sun_apparent(jd_to_centuries(2_460_300.643_75 + 69.0 / 86_400.0));
        assert!((s.lon_deg - 270.0).abs() < 0.03, "λ = {}", s.lon_deg);
    }

    #[test]
    fn distance_bounds() {
        for i in 0..365 {
            let s = sun_apparent(jd_to_centuries(2_460_000.5 + i as f64));
            assert!(s.distance > 0.983 && s.distance < 1.017, "R = {}", s.distance);
        }
    }
}
