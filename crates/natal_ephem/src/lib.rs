//! Ephemeris queries over uniformly sampled position tables.
//!
//! An [`Ephemeris`] owns one [`EphemerisTable`], either loaded from a
//! table file or tabulated from the built-in [`AnalyticModel`] at startup.
//! It is immutable after construction and can be shared across threads
//! via `Arc<Ephemeris>`.

pub mod analytic;
pub mod body;
pub mod error;
pub mod interpolate;
pub mod kepler;
pub mod lunar;
pub mod solar;
pub mod table;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use analytic::{AnalyticModel, MODEL_END_JD, MODEL_START_JD};
pub use body::{ALL_BODIES, CelestialBody};
pub use error::EphemerisError;
pub use table::{BodySeries, EphemerisTable, Sample};

/// Largest supported interpolation order.
pub const MAX_INTERPOLATION_ORDER: usize = 16;

/// Geocentric ecliptic position and daily motion of one body.
///
/// Longitude is always normalized to [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPosition {
    pub body: CelestialBody,
    /// Ecliptic longitude, degrees [0, 360).
    pub longitude: f64,
    /// Ecliptic latitude, degrees.
    pub latitude: f64,
    /// Distance in AU (zero for computed points).
    pub distance: f64,
    /// Degrees/day.
    pub speed_longitude: f64,
    /// Degrees/day.
    pub speed_latitude: f64,
    /// AU/day.
    pub speed_distance: f64,
}

impl BodyPosition {
    /// Apparent backward motion along the ecliptic.
    pub fn is_retrograde(&self) -> bool {
        self.speed_longitude < 0.0
    }
}

/// Ephemeris configuration used at startup time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Load samples from this table file instead of tabulating the model.
    pub table_path: Option<PathBuf>,
    /// First tabulated JD (TT).
    pub start_jd: f64,
    /// Last JD (TT) the tabulation must cover.
    pub end_jd: f64,
    pub step_days: f64,
    /// Number of samples in the interpolation window.
    pub interpolation_order: usize,
    /// Bodies to tabulate.
    pub bodies: Vec<CelestialBody>,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            // 1900-01-01 to 2050-01-01
            start_jd: 2_415_020.5,
            end_jd: 2_469_807.5,
            step_days: 1.0,
            interpolation_order: 8,
            bodies: ALL_BODIES
                .iter()
                .copied()
                .filter(|b| AnalyticModel.supports(*b))
                .collect(),
        }
    }
}

impl EphemerisConfig {
    pub fn validate(&self) -> Result<(), EphemerisError> {
        if !(2..=MAX_INTERPOLATION_ORDER).contains(&self.interpolation_order) {
            return Err(EphemerisError::InvalidConfig(
                "interpolation_order must be between 2 and 16",
            ));
        }
        if let Some(path) = &self.table_path {
            if path.as_os_str().is_empty() {
                return Err(EphemerisError::InvalidConfig("table_path must not be empty"));
            }
            return Ok(());
        }
        if !(self.step_days.is_finite() && self.step_days > 0.0) {
            return Err(EphemerisError::InvalidConfig(
                "step_days must be greater than zero",
            ));
        }
        if !(self.start_jd.is_finite() && self.end_jd.is_finite() && self.end_jd > self.start_jd)
        {
            return Err(EphemerisError::InvalidConfig("end_jd must be after start_jd"));
        }
        if self.start_jd < MODEL_START_JD || self.end_jd + self.step_days > MODEL_END_JD {
            return Err(EphemerisError::InvalidConfig(
                "tabulation range exceeds the analytic model's validity",
            ));
        }
        if self.bodies.is_empty() {
            return Err(EphemerisError::InvalidConfig("bodies must not be empty"));
        }
        Ok(())
    }
}

/// Immutable, shareable ephemeris data source.
#[derive(Debug)]
pub struct Ephemeris {
    table: EphemerisTable,
    order: usize,
}

impl Ephemeris {
    /// Build the data source described by `config`.
    pub fn new(config: &EphemerisConfig) -> Result<Self, EphemerisError> {
        config.validate()?;
        let table = match &config.table_path {
            Some(path) => EphemerisTable::load(path)?,
            None => EphemerisTable::tabulate(
                &AnalyticModel,
                &config.bodies,
                config.start_jd,
                config.end_jd,
                config.step_days,
            )?,
        };
        Self::from_table(table, config.interpolation_order)
    }

    /// Wrap an existing table.
    pub fn from_table(table: EphemerisTable, order: usize) -> Result<Self, EphemerisError> {
        if !(2..=MAX_INTERPOLATION_ORDER).contains(&order) {
            return Err(EphemerisError::InvalidConfig(
                "interpolation_order must be between 2 and 16",
            ));
        }
        if table.is_empty() {
            return Err(EphemerisError::InvalidConfig("ephemeris table is empty"));
        }
        Ok(Self { table, order })
    }

    pub fn table(&self) -> &EphemerisTable {
        &self.table
    }

    pub fn supports(&self, body: CelestialBody) -> bool {
        self.table.get(body).is_some()
    }

    /// `(first, last)` JD covered for the body.
    pub fn coverage(&self, body: CelestialBody) -> Option<(f64, f64)> {
        self.table.get(body).map(|s| (s.start_jd(), s.end_jd()))
    }

    /// Position of `body` at `jd_tt`.
    pub fn position(
        &self,
        jd_tt: f64,
        body: CelestialBody,
    ) -> Result<BodyPosition, EphemerisError> {
        if !jd_tt.is_finite() {
            return Err(EphemerisError::InvalidQuery("jd must be finite"));
        }
        let series = self
            .table
            .get(body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        let position = series.evaluate(jd_tt, self.order)?;
        debug!(%body, jd_tt, longitude = position.longitude, "ephemeris query");
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EphemerisConfig {
        EphemerisConfig {
            start_jd: 2_460_290.5,
            end_jd: 2_460_320.5,
            ..EphemerisConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        EphemerisConfig::default().validate().unwrap();
        assert!(!EphemerisConfig::default().bodies.contains(&CelestialBody::Chiron));
    }

    #[test]
    fn config_validation() {
        let mut c = small_config();
        c.interpolation_order = 1;
        assert!(c.validate().is_err());

        let mut c = small_config();
        c.step_days = 0.0;
        assert!(c.validate().is_err());

        let mut c = small_config();
        c.end_jd = c.start_jd;
        assert!(c.validate().is_err());

        let mut c = small_config();
        c.start_jd = 2_300_000.5;
        assert!(c.validate().is_err());

        let mut c = small_config();
        c.bodies.clear();
        assert!(c.validate().is_err());

        let mut c = small_config();
        c.table_path = Some(PathBuf::new());
        assert!(c.validate().is_err());
    }

    #[test]
    fn query_inside_and_outside_coverage() {
        let eph = Ephemeris::new(&small_config()).unwrap();
        let sun = eph.position(2_460_304.0, CelestialBody::Sun).unwrap();
        assert!((0.0..360.0).contains(&sun.longitude));
        let err = eph.position(2_460_400.0, CelestialBody::Sun).unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { .. }));
    }

    #[test]
    fn unsupported_and_invalid_queries() {
        let eph = Ephemeris::new(&small_config()).unwrap();
        assert_eq!(
            eph.position(2_460_304.0, CelestialBody::Chiron),
            Err(EphemerisError::UnsupportedBody(CelestialBody::Chiron))
        );
        assert!(matches!(
            eph.position(f64::NAN, CelestialBody::Sun),
            Err(EphemerisError::InvalidQuery(_))
        ));
    }

    #[test]
    fn empty_table_rejected() {
        assert!(Ephemeris::from_table(EphemerisTable::new(), 8).is_err());
    }

    #[test]
    fn retrograde_from_speed() {
        let mut p = BodyPosition {
            body: CelestialBody::Mercury,
            longitude: 10.0,
            latitude: 0.0,
            distance: 1.0,
            speed_longitude: -0.3,
            speed_latitude: 0.0,
            speed_distance: 0.0,
        };
        assert!(p.is_retrograde());
        p.speed_longitude = 0.1;
        assert!(!p.is_retrograde());
    }

    // Compile-time assertion: Ephemeris must be Send + Sync.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<Ephemeris>();
        }
    };
}
