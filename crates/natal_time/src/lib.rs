//! Civil to astronomical time resolution.
//!
//! This crate provides:
//! - Julian Day ↔ proleptic Gregorian calendar conversions
//! - The Espenak–Meeus Delta-T model
//! - Earth Rotation Angle, GMST and local sidereal time
//! - Coordinate → timezone lookup and DST-aware localization
//! - [`TimeResolver`], which turns a civil date, time and location into an
//!   [`AstronomicalMoment`]

pub mod delta_t;
pub mod error;
pub mod julian;
pub mod resolver;
pub mod sidereal;
pub mod utc_time;
pub mod zone;

pub use delta_t::delta_t_seconds;
pub use error::TimeError;
pub use julian::{
    DAYS_PER_CENTURY, J2000_JD, SECONDS_PER_DAY, calendar_to_jd, decimal_year, jd_to_calendar,
    jd_to_centuries,
};
pub use resolver::{AstronomicalMoment, TimeConfig, TimeResolver, validate_coordinates};
pub use sidereal::{earth_rotation_angle_deg, gmst_deg, local_sidereal_time_deg};
pub use utc_time::UtcTime;
pub use zone::{FixedZoneLookup, OceanPolicy, TzfLookup, ZoneLookup, ZoneSpec};
