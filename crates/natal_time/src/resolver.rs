//! Civil date/time/location → astronomical moment.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delta_t::delta_t_seconds;
use crate::error::TimeError;
use crate::julian::{SECONDS_PER_DAY, decimal_year};
use crate::sidereal::{gmst_deg, local_sidereal_time_deg};
use crate::utc_time::UtcTime;
use crate::zone::{OceanPolicy, TzfLookup, ZoneLookup, ZoneSpec, zone_for};

/// Configuration for time resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Policy for coordinates without a civil timezone.
    pub ocean_policy: OceanPolicy,
}

/// A civil instant expressed on the astronomical time axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstronomicalMoment {
    /// The instant in UTC.
    pub utc: NaiveDateTime,
    /// Label of the zone the civil time was read in.
    pub timezone: String,
    /// Offset of that zone at the instant, seconds east of UTC.
    pub utc_offset_seconds: i32,
    /// Julian Day, Universal Time.
    pub jd_ut: f64,
    /// Julian Day, Terrestrial (ephemeris) Time.
    pub jd_tt: f64,
    /// TT − UT in seconds.
    pub delta_t_seconds: f64,
    /// Greenwich mean sidereal time, degrees.
    pub gmst_deg: f64,
    /// Local sidereal time at `longitude_deg`, degrees.
    pub lst_deg: f64,
    /// East-positive longitude the sidereal time refers to.
    pub longitude_deg: f64,
}

impl AstronomicalMoment {
    /// Build a moment from a UTC instant and an observer longitude.
    pub fn from_utc(utc: NaiveDateTime, longitude_deg: f64) -> Self {
        let jd_ut = UtcTime::from(utc).to_jd();
        let delta_t = delta_t_seconds(decimal_year(utc.year(), utc.month()));
        let gmst = gmst_deg(jd_ut);
        Self {
            utc,
            timezone: "UTC".to_string(),
            utc_offset_seconds: 0,
            jd_ut,
            jd_tt: jd_ut + delta_t / SECONDS_PER_DAY,
            delta_t_seconds: delta_t,
            gmst_deg: gmst,
            lst_deg: local_sidereal_time_deg(gmst, longitude_deg),
            longitude_deg,
        }
    }

    /// Same instant with sidereal time taken at another longitude.
    pub fn at_longitude(&self, longitude_deg: f64) -> Self {
        Self {
            lst_deg: local_sidereal_time_deg(self.gmst_deg, longitude_deg),
            longitude_deg,
            ..self.clone()
        }
    }

    /// Right ascension of the meridian, degrees (equal to LST).
    pub fn ramc_deg(&self) -> f64 {
        self.lst_deg
    }
}

/// Converts civil date, time and location into an [`AstronomicalMoment`].
#[derive(Clone)]
pub struct TimeResolver {
    lookup: Arc<dyn ZoneLookup>,
    config: TimeConfig,
}

impl std::fmt::Debug for TimeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TimeResolver {
    /// Resolver backed by the `tzf-rs` boundary finder.
    pub fn new(config: TimeConfig) -> Self {
        Self::with_lookup(Arc::new(TzfLookup::new()), config)
    }

    /// Resolver with an injected zone lookup.
    pub fn with_lookup(lookup: Arc<dyn ZoneLookup>, config: TimeConfig) -> Self {
        Self { lookup, config }
    }

    pub fn config(&self) -> &TimeConfig {
        &self.config
    }

    /// Resolve a civil time read at the given coordinates.
    pub fn resolve(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<AstronomicalMoment, TimeError> {
        validate_coordinates(latitude, longitude)?;
        let zone = zone_for(
            self.lookup.as_ref(),
            self.config.ocean_policy,
            latitude,
            longitude,
        )?;
        debug!(latitude, longitude, zone = %zone, "zone resolved");
        Ok(self
            .resolve_in_zone(date, time, &zone)?
            .at_longitude(longitude))
    }

    /// Resolve a civil time read in an explicit zone.
    ///
    /// Sidereal time refers to Greenwich; use
    /// [`AstronomicalMoment::at_longitude`] for another meridian.
    pub fn resolve_in_zone(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        zone: &ZoneSpec,
    ) -> Result<AstronomicalMoment, TimeError> {
        let (utc, offset) = zone.to_utc(date.and_time(time))?;
        let mut moment = AstronomicalMoment::from_utc(utc, 0.0);
        moment.timezone = zone.to_string();
        moment.utc_offset_seconds = offset;
        debug!(
            %utc,
            jd_ut = moment.jd_ut,
            delta_t = moment.delta_t_seconds,
            "civil time resolved"
        );
        Ok(moment)
    }
}

/// Check that coordinates are finite and on the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), TimeError> {
    if !latitude.is_finite() || latitude.abs() > 90.0 {
        return Err(TimeError::invalid("latitude", latitude));
    }
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return Err(TimeError::invalid("longitude", longitude));
    }
    Ok(())
}
