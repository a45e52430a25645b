//! Geographic timezone lookup and civil-time localization.
//!
//! Coordinates are mapped to an IANA zone name through the [`ZoneLookup`]
//! seam. The default implementation wraps the `tzf-rs` polygon finder,
//! which is loaded once and shared. Localization of wall-clock times goes
//! through `chrono-tz`.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tzf_rs::DefaultFinder;

use crate::error::TimeError;

/// Largest accepted fixed UTC offset, in hours.
pub const MAX_OFFSET_HOURS: f64 = 14.0;

/// Maps geographic coordinates to an IANA zone name.
pub trait ZoneLookup: Send + Sync {
    /// Zone name for the point, or `None` when the point has no zone.
    fn zone_name(&self, latitude: f64, longitude: f64) -> Option<&str>;
}

/// Polygon-based lookup backed by `tzf-rs`.
pub struct TzfLookup {
    finder: DefaultFinder,
}

impl TzfLookup {
    pub fn new() -> Self {
        info!("loading timezone boundary data");
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TzfLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TzfLookup").finish_non_exhaustive()
    }
}

impl ZoneLookup for TzfLookup {
    fn zone_name(&self, latitude: f64, longitude: f64) -> Option<&str> {
        let name = self.finder.get_tz_name(longitude, latitude);
        if name.is_empty() { None } else { Some(name) }
    }
}

/// Lookup that answers the same zone everywhere, or nothing at all.
///
/// Useful when the caller already knows the zone, and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedZoneLookup {
    name: Option<String>,
}

impl FixedZoneLookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// A lookup that never finds a zone.
    pub fn none() -> Self {
        Self { name: None }
    }
}

impl ZoneLookup for FixedZoneLookup {
    fn zone_name(&self, _latitude: f64, _longitude: f64) -> Option<&str> {
        self.name.as_deref()
    }
}

/// What to do with points that have no civil timezone (open ocean).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OceanPolicy {
    /// Missing zones and `Etc/*` maritime zones are unresolvable.
    #[default]
    Reject,
    /// Accept maritime zones; without any zone, use `round(lon / 15)` hours.
    Nautical,
}

/// A resolved timezone: either a named IANA zone or a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneSpec {
    Named(Tz),
    FixedOffsetHours(f64),
}

impl ZoneSpec {
    /// Fixed offset in hours east of UTC, validated against ±14 h.
    pub fn fixed_hours(hours: f64) -> Result<Self, TimeError> {
        if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
            return Err(TimeError::invalid("timezone", hours));
        }
        Ok(Self::FixedOffsetHours(hours))
    }

    fn fixed_offset(hours: f64) -> Result<FixedOffset, TimeError> {
        let seconds = (hours * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).ok_or_else(|| TimeError::invalid("timezone", hours))
    }

    /// Convert a wall-clock time in this zone to UTC.
    ///
    /// Returns the UTC instant and the offset in seconds east of UTC.
    /// Ambiguous times (DST fall-back) resolve to standard time, the
    /// later of the two instants. Times inside a DST gap are rejected.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<(NaiveDateTime, i32), TimeError> {
        match self {
            Self::Named(tz) => match tz.from_local_datetime(&local) {
                LocalResult::Single(dt) => {
                    Ok((dt.naive_utc(), dt.offset().fix().local_minus_utc()))
                }
                LocalResult::Ambiguous(earlier, later) => {
                    debug!(%local, zone = %tz, %earlier, %later, "ambiguous local time, using standard time");
                    Ok((later.naive_utc(), later.offset().fix().local_minus_utc()))
                }
                LocalResult::None => Err(TimeError::invalid(
                    "time",
                    format!("{local} does not exist in {tz}"),
                )),
            },
            Self::FixedOffsetHours(hours) => {
                let offset = Self::fixed_offset(*hours)?;
                match offset.from_local_datetime(&local) {
                    LocalResult::Single(dt) => Ok((dt.naive_utc(), offset.local_minus_utc())),
                    _ => Err(TimeError::invalid("time", local)),
                }
            }
        }
    }
}

impl fmt::Display for ZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::FixedOffsetHours(h) => write!(f, "{h}"),
        }
    }
}

impl FromStr for ZoneSpec {
    type Err = TimeError;

    /// Accepts an IANA name (`Europe/Paris`) or a decimal hour offset (`-3.5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(hours) = s.parse::<f64>() {
            return Self::fixed_hours(hours);
        }
        s.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| TimeError::invalid("timezone", s))
    }
}

fn is_maritime(name: &str) -> bool {
    name.starts_with("Etc/")
}

/// Resolve the zone for a coordinate pair under an ocean policy.
pub fn zone_for(
    lookup: &dyn ZoneLookup,
    policy: OceanPolicy,
    latitude: f64,
    longitude: f64,
) -> Result<ZoneSpec, TimeError> {
    let failure = TimeError::TimezoneResolutionFailure {
        latitude,
        longitude,
    };
    match lookup.zone_name(latitude, longitude) {
        Some(name) if !is_maritime(name) || policy == OceanPolicy::Nautical => {
            name.parse::<Tz>().map(ZoneSpec::Named).map_err(|_| failure)
        }
        Some(name) => {
            debug!(name, "maritime zone rejected");
            Err(failure)
        }
        None if policy == OceanPolicy::Nautical => {
            Ok(ZoneSpec::FixedOffsetHours((longitude / 15.0).round()))
        }
        None => Err(failure),
    }
}
