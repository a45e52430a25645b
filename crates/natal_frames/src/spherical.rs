//! Cartesian ↔ spherical conversion.
//!
//! Lengths are in whatever unit the caller uses (AU throughout the
//! ephemeris).

use crate::normalize_deg;

/// Longitude, latitude and distance of a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoords {
    /// Degrees [0, 360), counter-clockwise from +x.
    pub lon_deg: f64,
    /// Degrees [-90, 90] above the x-y plane.
    pub lat_deg: f64,
    pub distance: f64,
}

/// The origin maps to all zeros.
pub fn cartesian_to_spherical(xyz: &[f64; 3]) -> SphericalCoords {
    let [x, y, z] = *xyz;
    let distance = x.hypot(y).hypot(z);
    if distance == 0.0 {
        return SphericalCoords {
            lon_deg: 0.0,
            lat_deg: 0.0,
            distance,
        };
    }
    SphericalCoords {
        lon_deg: normalize_deg(y.atan2(x).to_degrees()),
        lat_deg: (z / distance).asin().to_degrees(),
        distance,
    }
}

pub fn spherical_to_cartesian(s: &SphericalCoords) -> [f64; 3] {
    let (sin_lon, cos_lon) = s.lon_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = s.lat_deg.to_radians().sin_cos();
    let planar = s.distance * cos_lat;
    [planar * cos_lon, planar * sin_lon, s.distance * sin_lat]
}
