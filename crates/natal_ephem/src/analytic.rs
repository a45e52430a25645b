//! Built-in analytic model used to tabulate ephemeris samples.
//!
//! Dispatches each body to its theory and refers every longitude to the
//! true equinox of date.

use natal_frames::{SphericalCoords, normalize_deg, nutation_longitude_deg};
use natal_time::jd_to_centuries;

use crate::body::CelestialBody;
use crate::error::EphemerisError;
use crate::{kepler, lunar, solar};

/// First JD the model is valid for (1800-01-01 0h TT).
pub const MODEL_START_JD: f64 = 2_378_496.5;
/// Last JD the model is valid for (2050-12-31 0h TT).
pub const MODEL_END_JD: f64 = 2_470_171.5;

/// Analytic positions for every body except Chiron.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticModel;

impl AnalyticModel {
    /// Whether the model can compute the body at all.
    pub fn supports(&self, body: CelestialBody) -> bool {
        body != CelestialBody::Chiron
    }

    /// Geocentric ecliptic coordinates (AU) at `jd_tt`.
    pub fn coords(&self, body: CelestialBody, jd_tt: f64) -> Result<SphericalCoords, EphemerisError> {
        if !jd_tt.is_finite() {
            return Err(EphemerisError::InvalidQuery("jd must be finite"));
        }
        if !(MODEL_START_JD..=MODEL_END_JD).contains(&jd_tt) {
            return Err(EphemerisError::OutOfRange {
                body,
                jd: jd_tt,
                start: MODEL_START_JD,
                end: MODEL_END_JD,
            });
        }
        let t = jd_to_centuries(jd_tt);

        // The solar theory already returns apparent longitude.
        let mut coords = match body {
            CelestialBody::Sun => return Ok(solar::sun_apparent(t)),
            CelestialBody::Moon => lunar::moon_geocentric(t),
            CelestialBody::MeanNode => point(lunar::mean_node_deg(t)),
            CelestialBody::TrueNode => point(lunar::true_node_deg(t)),
            CelestialBody::MeanApogee => point(lunar::mean_apogee_deg(t)),
            CelestialBody::Chiron => return Err(EphemerisError::UnsupportedBody(body)),
            _ => kepler::planet_geocentric(body, t).ok_or(EphemerisError::UnsupportedBody(body))?,
        };
        coords.lon_deg = normalize_deg(coords.lon_deg + nutation_longitude_deg(t));
        Ok(coords)
    }
}

/// A point on the ecliptic with no latitude or distance.
fn point(lon_deg: f64) -> SphericalCoords {
    SphericalCoords {
        lon_deg,
        lat_deg: 0.0,
        distance: 0.0,
    }
}
