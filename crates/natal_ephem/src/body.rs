//! Closed set of bodies and computed points an ephemeris can serve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EphemerisError;

/// A body or computed point with an ecliptic position.
///
/// Names returned by [`CelestialBody::name`] are stable: they key table
/// files, configuration and response maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    TrueNode,
    MeanNode,
    /// Mean lunar apogee (Black Moon Lilith).
    #[serde(rename = "Lilith")]
    MeanApogee,
}

/// All bodies in chart order.
pub const ALL_BODIES: [CelestialBody; 14] = [
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Uranus,
    CelestialBody::Neptune,
    CelestialBody::Pluto,
    CelestialBody::Chiron,
    CelestialBody::TrueNode,
    CelestialBody::MeanNode,
    CelestialBody::MeanApogee,
];

impl CelestialBody {
    pub const fn all() -> &'static [CelestialBody] {
        &ALL_BODIES
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::Chiron => "Chiron",
            Self::TrueNode => "TrueNode",
            Self::MeanNode => "MeanNode",
            Self::MeanApogee => "Lilith",
        }
    }

    /// Computed points (nodes, apogee) rather than physical bodies.
    pub const fn is_point(self) -> bool {
        matches!(self, Self::TrueNode | Self::MeanNode | Self::MeanApogee)
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CelestialBody {
    type Err = EphemerisError;

    /// Case-insensitive; accepts `_`/space separators and a few aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        let body = match key.as_str() {
            "northnode" | "node" => Self::TrueNode,
            "meanapogee" | "blackmoon" => Self::MeanApogee,
            _ => match ALL_BODIES
                .iter()
                .find(|b| b.name().to_lowercase() == key)
            {
                Some(b) => *b,
                None => return Err(EphemerisError::UnknownBody(s.to_string())),
            },
        };
        Ok(body)
    }
}
