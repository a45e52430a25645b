//! Tropical zodiac placement, rulerships and lunar phase.
//!
//! Signs are 30° slices of ecliptic longitude starting at the vernal
//! equinox. Rulerships follow the modern scheme (Pluto, Uranus and Neptune
//! rule Scorpio, Aquarius and Pisces).

use std::fmt;

use natal_ephem::CelestialBody;
use natal_frames::normalize_deg;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// Sign containing a tropical longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        let index = (normalize_deg(longitude) / 30.0).floor() as usize;
        ALL_SIGNS[index.min(11)]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Modern ruling body.
    pub const fn ruler(self) -> CelestialBody {
        match self {
            Self::Aries => CelestialBody::Mars,
            Self::Taurus | Self::Libra => CelestialBody::Venus,
            Self::Gemini | Self::Virgo => CelestialBody::Mercury,
            Self::Cancer => CelestialBody::Moon,
            Self::Leo => CelestialBody::Sun,
            Self::Scorpio => CelestialBody::Pluto,
            Self::Sagittarius => CelestialBody::Jupiter,
            Self::Capricorn => CelestialBody::Saturn,
            Self::Aquarius => CelestialBody::Uranus,
            Self::Pisces => CelestialBody::Neptune,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Sign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Degrees elapsed within the sign, [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    normalize_deg(longitude) % 30.0
}

/// Degree and minute within the sign, e.g. `12°05’`.
///
/// Minutes are rounded; a rounded 60 carries into the next degree but
/// never into the next sign, so the text agrees with
/// [`Sign::from_longitude`] for the same longitude.
pub fn format_deg_min(longitude: f64) -> String {
    let lon = normalize_deg(longitude);
    let mut deg = lon.trunc() as u32 % 30;
    let mut minutes = (lon.fract() * 60.0).round() as u32;
    if minutes == 60 {
        if deg == 29 {
            minutes = 59;
        } else {
            deg += 1;
            minutes = 0;
        }
    }
    format!("{deg}°{minutes:02}’")
}

/// The eight named phases of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

const PHASES: [MoonPhase; 8] = [
    MoonPhase::NewMoon,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::FullMoon,
    MoonPhase::WaningGibbous,
    MoonPhase::LastQuarter,
    MoonPhase::WaningCrescent,
];

impl MoonPhase {
    /// Phase for a Moon − Sun elongation; each phase spans 45° centred on
    /// a multiple of 45°.
    pub fn from_elongation(elongation: f64) -> Self {
        let index = (normalize_deg(elongation + 22.5) / 45.0).floor() as usize;
        PHASES[index % 8]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::NewMoon => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌕",
            Self::WaningGibbous => "🌖",
            Self::LastQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MoonPhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Lunar phase derived from the Sun and Moon longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhase {
    pub phase: MoonPhase,
    /// Moon − Sun elongation, degrees [0, 360).
    pub angle: f64,
    /// Linear illuminated fraction in percent: 0 at new, 100 at full.
    pub illumination: f64,
}

impl LunarPhase {
    pub fn new(sun_longitude: f64, moon_longitude: f64) -> Self {
        let angle = normalize_deg(moon_longitude - sun_longitude);
        Self {
            phase: MoonPhase::from_elongation(angle),
            angle,
            illumination: (1.0 - (angle - 180.0).abs() / 180.0) * 100.0,
        }
    }
}
