//! Bridge between chrono's civil instants and the Julian Day axis.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::julian::SECONDS_PER_DAY;

/// JD of the Unix epoch, 1970-01-01T00:00:00 UTC.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// A UTC instant that converts to and from Julian Days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTime(pub NaiveDateTime);

impl UtcTime {
    /// Julian Day (UT) of this instant.
    pub fn to_jd(&self) -> f64 {
        let utc = self.0.and_utc();
        let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
        UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
    }

    /// Instant for a Julian Day (UT), rounded to the millisecond.
    ///
    /// `None` outside chrono's representable range.
    pub fn from_jd(jd: f64) -> Option<Self> {
        let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return None;
        }
        let utc = DateTime::<Utc>::UNIX_EPOCH.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)?;
        Some(Self(utc.naive_utc()))
    }

    /// Fraction of the civil day elapsed, [0, 1).
    pub fn day_fraction(&self) -> f64 {
        let jd = self.to_jd() + 0.5;
        jd - jd.floor()
    }
}

impl From<NaiveDateTime> for UtcTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Z", self.0.format("%Y-%m-%dT%H:%M:%S%.f"))
    }
}
