//! Response shapes handed to the request-handling layer.
//!
//! Field names and key order match the existing planets and sun endpoints,
//! so a transport layer can serialize these directly.

use chrono::{NaiveDate, NaiveTime};
use natal_ephem::{BodyPosition, CelestialBody};
use natal_time::AstronomicalMoment;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::chart::{Chart, DATE_FORMAT, TIME_FORMAT};
use crate::zodiac::{LunarPhase, MoonPhase, Sign, format_deg_min};

/// Houses in the order the planets endpoint emits them: the four angles
/// first, then the intermediate cusps.
const HOUSE_ORDER: [u8; 12] = [1, 10, 4, 7, 2, 3, 5, 6, 8, 9, 11, 12];

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Insertion-ordered string-keyed map.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonPhaseEntry {
    pub phase: MoonPhase,
    pub phase_emoji: &'static str,
    pub illumination: f64,
    pub angle: f64,
}

impl From<&LunarPhase> for MoonPhaseEntry {
    fn from(p: &LunarPhase) -> Self {
        Self {
            phase: p.phase,
            phase_emoji: p.phase.emoji(),
            illumination: round_to(p.illumination, 1),
            angle: round_to(p.angle, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetEntry {
    pub longitude: f64,
    pub longitude_formatted: String,
    pub sign: Sign,
    pub latitude: f64,
    pub distance: f64,
    pub retrograde: bool,
    pub speed_longitude: f64,
    pub speed_latitude: f64,
    pub speed_distance: f64,
    pub house: u8,
    pub house_formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<MoonPhaseEntry>,
}

/// Where a house's ruling body sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RulerPosition {
    pub longitude: f64,
    pub longitude_formatted: String,
    pub sign: Sign,
    pub house: u8,
    pub house_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseEntry {
    pub longitude: f64,
    pub longitude_formatted: String,
    pub sign: Sign,
    /// Set on the four angles only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub sign_ruler: CelestialBody,
    pub house_ruler: CelestialBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruler_position: Option<RulerPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectEntry {
    pub planet1: String,
    pub planet2: String,
    pub aspect: String,
    /// Absolute orb, rounded to hundredths.
    pub orb: f64,
    pub applying: Option<bool>,
}

/// Planets endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetsResponse {
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Julian Day (UT).
    pub julian_day: f64,
    pub planets: OrderedMap<PlanetEntry>,
    pub houses: OrderedMap<HouseEntry>,
    pub aspects: Vec<AspectEntry>,
}

fn house_label(house: u8) -> String {
    format!("House {house}")
}

impl From<&Chart> for PlanetsResponse {
    fn from(chart: &Chart) -> Self {
        let planets: Vec<(String, PlanetEntry)> = chart
            .positions
            .iter()
            .zip(&chart.placements)
            .map(|(pos, placement)| {
                let phase = match pos.body {
                    CelestialBody::Moon => chart.moon_phase.as_ref().map(MoonPhaseEntry::from),
                    _ => None,
                };
                let entry = PlanetEntry {
                    longitude: pos.longitude,
                    longitude_formatted: format_deg_min(pos.longitude),
                    sign: placement.sign,
                    latitude: pos.latitude,
                    distance: pos.distance,
                    retrograde: placement.retrograde,
                    speed_longitude: pos.speed_longitude,
                    speed_latitude: pos.speed_latitude,
                    speed_distance: pos.speed_distance,
                    house: placement.house,
                    house_formatted: house_label(placement.house),
                    phase,
                };
                (pos.body.name().to_string(), entry)
            })
            .collect();

        let houses = HOUSE_ORDER
            .iter()
            .filter_map(|&index| {
                let longitude = chart.houses.cusp(index)?;
                let sign = Sign::from_longitude(longitude);
                let name = match index {
                    1 => Some("Ascendant"),
                    10 => Some("MC"),
                    4 => Some("IC"),
                    7 => Some("DSC"),
                    _ => None,
                };
                let ruler_position = chart.position(sign.ruler()).map(|pos| {
                    let house = chart.houses.house_of(pos.longitude);
                    RulerPosition {
                        longitude: pos.longitude,
                        longitude_formatted: format_deg_min(pos.longitude),
                        sign: Sign::from_longitude(pos.longitude),
                        house,
                        house_formatted: house_label(house),
                    }
                });
                let entry = HouseEntry {
                    longitude,
                    longitude_formatted: format_deg_min(longitude),
                    sign,
                    name,
                    sign_ruler: sign.ruler(),
                    house_ruler: sign.ruler(),
                    ruler_position,
                };
                Some((index.to_string(), entry))
            })
            .collect();

        let aspects = chart
            .aspects
            .iter()
            .map(|a| AspectEntry {
                planet1: a.a.name().to_string(),
                planet2: a.b.name().to_string(),
                aspect: a.kind.name().to_string(),
                orb: round_to(a.orb.abs(), 2),
                applying: a.applying,
            })
            .collect();

        Self {
            date: chart.request.date.format(DATE_FORMAT).to_string(),
            time: chart.request.time.format(TIME_FORMAT).to_string(),
            timezone: chart.moment.timezone.clone(),
            latitude: chart.request.latitude,
            longitude: chart.request.longitude,
            julian_day: chart.moment.jd_ut,
            planets: OrderedMap(planets),
            houses: OrderedMap(houses),
            aspects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    pub speed_longitude: f64,
    pub speed_latitude: f64,
    pub speed_distance: f64,
}

impl From<&BodyPosition> for SunPosition {
    fn from(p: &BodyPosition) -> Self {
        Self {
            longitude: p.longitude,
            latitude: p.latitude,
            distance: p.distance,
            speed_longitude: p.speed_longitude,
            speed_latitude: p.speed_latitude,
            speed_distance: p.speed_distance,
        }
    }
}

/// Sun endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunReport {
    pub date: String,
    pub time: String,
    pub timezone: String,
    /// Julian Day (UT).
    pub julian_day: f64,
    pub sun_position: SunPosition,
}

impl SunReport {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        moment: &AstronomicalMoment,
        sun: &BodyPosition,
    ) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            time: time.format(TIME_FORMAT).to_string(),
            timezone: moment.timezone.clone(),
            julian_day: moment.jd_ut,
            sun_position: SunPosition::from(sun),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(99.96, 1), 100.0);
        assert_eq!(round_to(-3.456, 1), -3.5);
    }

    #[test]
    fn ordered_map_keeps_insertion_order() {
        let map = OrderedMap(vec![
            ("10".to_string(), 1),
            ("1".to_string(), 2),
            ("4".to_string(), 3),
        ]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"10":1,"1":2,"4":3}"#);
        assert_eq!(map.get("1"), Some(&2));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn sun_report_shape() {
        let utc = NaiveDate::from_ymd_opt(2023, 12, 25)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let moment = AstronomicalMoment::from_utc(utc, 0.0);
        let sun = BodyPosition {
            body: CelestialBody::Sun,
            longitude: 273.4,
            latitude: 0.0,
            distance: 0.9834,
            speed_longitude: 1.019,
            speed_latitude: 0.0,
            speed_distance: 0.0,
        };
        let report = SunReport::new(utc.date(), utc.time(), &moment, &sun);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["date"], "2023-12-25");
        assert_eq!(value["time"], "12:00:00");
        assert_eq!(value["timezone"], "UTC");
        assert_eq!(value["julian_day"], 2_460_304.0);
        assert_eq!(value["sun_position"]["longitude"], 273.4);
        let keys: Vec<_> = value["sun_position"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn moon_phase_entry_rounds() {
        let phase = LunarPhase::new(10.0, 100.04);
        let entry = MoonPhaseEntry::from(&phase);
        assert_eq!(entry.phase, MoonPhase::FirstQuarter);
        assert_eq!(entry.angle, 90.0);
        assert_eq!(entry.illumination, 50.0);
        assert_eq!(entry.phase_emoji, "🌓");
    }
}
