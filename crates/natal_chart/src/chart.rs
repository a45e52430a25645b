//! Chart assembly: time, ephemeris, houses and aspects for one request.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use natal_ephem::{BodyPosition, CelestialBody, Ephemeris};
use natal_time::{AstronomicalMoment, TimeResolver, ZoneSpec, validate_coordinates};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aspects::{Aspect, AspectMatcher, ChartAngle, ChartPoint, PointPosition};
use crate::contract::SunReport;
use crate::error::ChartError;
use crate::houses::{HouseSet, HouseSolver};
use crate::zodiac::{LunarPhase, Sign, degree_in_sign};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Civil date, time and location of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
}

impl ChartRequest {
    pub fn new(date: NaiveDate, time: NaiveTime, latitude: f64, longitude: f64) -> Self {
        Self {
            date,
            time,
            latitude,
            longitude,
        }
    }

    /// Parse `YYYY-MM-DD` and optional `HH:MM:SS` (midnight when absent).
    pub fn parse(
        date: &str,
        time: Option<&str>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ChartError> {
        let date = parse_date(date)?;
        let time = match time {
            Some(t) => parse_time(t)?,
            None => NaiveTime::MIN,
        };
        validate_coordinates(latitude, longitude)?;
        Ok(Self::new(date, time, latitude, longitude))
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ChartError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| ChartError::invalid("date", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, ChartError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| ChartError::invalid("time", s))
}

/// Which bodies a chart includes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub bodies: Vec<CelestialBody>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bodies: CelestialBody::all()
                .iter()
                .copied()
                .filter(|b| *b != CelestialBody::Chiron)
                .collect(),
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.bodies.is_empty() {
            return Err(ChartError::InvalidConfig("chart bodies must not be empty"));
        }
        let unique: HashSet<_> = self.bodies.iter().collect();
        if unique.len() != self.bodies.len() {
            return Err(ChartError::InvalidConfig("chart bodies must not repeat"));
        }
        Ok(())
    }
}

/// Longitudes of the four angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
    pub imum_coeli: f64,
    pub descendant: f64,
}

impl Angles {
    fn from_houses(houses: &HouseSet) -> Self {
        Self {
            ascendant: houses.ascendant,
            midheaven: houses.midheaven,
            imum_coeli: houses.imum_coeli(),
            descendant: houses.descendant(),
        }
    }

    pub fn get(&self, angle: ChartAngle) -> f64 {
        match angle {
            ChartAngle::Ascendant => self.ascendant,
            ChartAngle::Midheaven => self.midheaven,
            ChartAngle::ImumCoeli => self.imum_coeli,
            ChartAngle::Descendant => self.descendant,
        }
    }
}

/// Zodiac and house placement of one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub body: CelestialBody,
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub house: u8,
    pub retrograde: bool,
}

/// A computed chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub request: ChartRequest,
    pub moment: AstronomicalMoment,
    /// One entry per configured body, in configured order.
    pub positions: Vec<BodyPosition>,
    pub placements: Vec<Placement>,
    pub houses: HouseSet,
    pub angles: Angles,
    pub aspects: Vec<Aspect>,
    /// Present when both the Sun and the Moon are charted.
    pub moon_phase: Option<LunarPhase>,
}

impl Chart {
    pub fn position(&self, body: CelestialBody) -> Option<&BodyPosition> {
        self.positions.iter().find(|p| p.body == body)
    }

    pub fn placement(&self, body: CelestialBody) -> Option<&Placement> {
        self.placements.iter().find(|p| p.body == body)
    }
}

/// Orchestrates the per-request pipeline over shared components.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    ephemeris: Arc<Ephemeris>,
    resolver: TimeResolver,
    houses: HouseSolver,
    aspects: AspectMatcher,
    config: ChartConfig,
}

impl ChartBuilder {
    pub fn new(
        ephemeris: Arc<Ephemeris>,
        resolver: TimeResolver,
        houses: HouseSolver,
        aspects: AspectMatcher,
        config: ChartConfig,
    ) -> Result<Self, ChartError> {
        config.validate()?;
        info!(bodies = config.bodies.len(), "chart builder ready");
        Ok(Self {
            ephemeris,
            resolver,
            houses,
            aspects,
            config,
        })
    }

    pub fn ephemeris(&self) -> &Arc<Ephemeris> {
        &self.ephemeris
    }

    pub fn resolver(&self) -> &TimeResolver {
        &self.resolver
    }

    pub fn house_solver(&self) -> &HouseSolver {
        &self.houses
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Build a full chart. Any failing stage aborts the whole chart.
    pub fn build(&self, request: &ChartRequest) -> Result<Chart, ChartError> {
        let moment = self.resolver.resolve(
            request.date,
            request.time,
            request.latitude,
            request.longitude,
        )?;

        let positions = self
            .config
            .bodies
            .iter()
            .map(|&body| self.ephemeris.position(moment.jd_tt, body))
            .collect::<Result<Vec<_>, _>>()?;

        let houses = self.houses.solve(&moment, request.latitude)?;
        let angles = Angles::from_houses(&houses);

        let points: Vec<PointPosition> = positions
            .iter()
            .map(|p| PointPosition {
                point: ChartPoint::Body(p.body),
                longitude: p.longitude,
                speed: Some(p.speed_longitude),
            })
            .chain(ChartAngle::ALL.iter().map(|&a| PointPosition {
                point: ChartPoint::Angle(a),
                longitude: angles.get(a),
                speed: None,
            }))
            .collect();
        let aspects = self.aspects.find(&points);

        let placements = positions
            .iter()
            .map(|p| Placement {
                body: p.body,
                sign: Sign::from_longitude(p.longitude),
                degree_in_sign: degree_in_sign(p.longitude),
                house: houses.house_of(p.longitude),
                retrograde: p.is_retrograde(),
            })
            .collect();

        let longitude_of = |body| {
            positions
                .iter()
                .find(|p| p.body == body)
                .map(|p| p.longitude)
        };
        let moon_phase = match (
            longitude_of(CelestialBody::Sun),
            longitude_of(CelestialBody::Moon),
        ) {
            (Some(sun), Some(moon)) => Some(LunarPhase::new(sun, moon)),
            _ => None,
        };

        debug!(
            jd_ut = moment.jd_ut,
            bodies = positions.len(),
            aspects = aspects.len(),
            asc = angles.ascendant,
            "chart built"
        );
        Ok(Chart {
            request: *request,
            moment,
            positions,
            placements,
            houses,
            angles,
            aspects,
            moon_phase,
        })
    }

    /// Sun position for a civil time read in an explicit zone.
    pub fn sun_report(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        zone: &ZoneSpec,
    ) -> Result<SunReport, ChartError> {
        let moment = self.resolver.resolve_in_zone(date, time, zone)?;
        let sun = self.ephemeris.position(moment.jd_tt, CelestialBody::Sun)?;
        debug!(jd_ut = moment.jd_ut, longitude = sun.longitude, "sun report");
        Ok(SunReport::new(date, time, &moment, &sun))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use natal_ephem::EphemerisConfig;
    use natal_time::{FixedZoneLookup, TimeConfig};

    fn builder() -> ChartBuilder {
        let ephemeris = Ephemeris::new(&EphemerisConfig {
            start_jd: 2_460_290.5,
            end_jd: 2_460_320.5,
            ..EphemerisConfig::default()
        })
        .unwrap();
        ChartBuilder::new(
            Arc::new(ephemeris),
            TimeResolver::with_lookup(Arc::new(FixedZoneLookup::new("UTC")), TimeConfig::default()),
            HouseSolver::default(),
            AspectMatcher::default(),
            ChartConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn request_parsing() {
        let r = ChartRequest::parse("2023-12-25", Some("12:00:00"), 51.5, -0.12).unwrap();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
        assert_eq!(r.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        let midnight = ChartRequest::parse("2023-12-25", None, 0.0, 0.0).unwrap();
        assert_eq!(midnight.time, NaiveTime::MIN);
    }

    #[test]
    fn request_rejects_malformed_fields() {
        for (date, time, lat, field) in [
            ("2023-13-01", Some("00:00:00"), 0.0, "date"),
            ("25/12/2023", None, 0.0, "date"),
            ("2023-12-25", Some("25:00:00"), 0.0, "time"),
            ("2023-12-25", Some("12:00"), 0.0, "time"),
            ("2023-12-25", None, 95.0, "latitude"),
        ] {
            let err = ChartRequest::parse(date, time, lat, 0.0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{date} {time:?}");
            let text = err.to_string();
            assert!(text.contains(field), "{text}");
        }
    }

    #[test]
    fn config_rejects_duplicates() {
        let config = ChartConfig {
            bodies: vec![CelestialBody::Sun, CelestialBody::Sun],
        };
        assert!(config.validate().is_err());
        assert!(ChartConfig { bodies: Vec::new() }.validate().is_err());
        assert!(!ChartConfig::default().bodies.contains(&CelestialBody::Chiron));
    }

    #[test]
    fn christmas_chart() {
        let b = builder();
        let req = ChartRequest::parse("2023-12-25", Some("12:00:00"), 51.5, 0.0).unwrap();
        let chart = b.build(&req).unwrap();
        assert_eq!(chart.positions.len(), 13);
        assert_eq!(chart.placements.len(), 13);
        let sun = chart.position(CelestialBody::Sun).unwrap();
        assert!((sun.longitude - 273.1).abs() < 0.5);
        assert_eq!(chart.placement(CelestialBody::Sun).unwrap().sign, Sign::Capricorn);
        assert!(chart.moon_phase.is_some());
        for a in &chart.aspects {
            assert!(a.a < a.b);
        }
        assert_eq!(chart.houses.cusp(1), Some(chart.angles.ascendant));
    }

    #[test]
    fn first_failure_aborts() {
        let b = builder();
        let polar = ChartRequest::parse("2023-12-25", Some("12:00:00"), 70.0, 0.0).unwrap();
        assert_eq!(b.build(&polar).unwrap_err().kind(), ErrorKind::ConvergenceFailure);
        let late = ChartRequest::parse("2030-01-01", None, 10.0, 0.0).unwrap();
        assert_eq!(
            b.build(&late).unwrap_err().kind(),
            ErrorKind::EphemerisDataUnavailable
        );
    }

    #[test]
    fn sun_report_uses_explicit_zone() {
        let b = builder();
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let utc = b.sun_report(date, noon, &ZoneSpec::FixedOffsetHours(0.0)).unwrap();
        let tokyo = b
            .sun_report(date, noon, &"Asia/Tokyo".parse::<ZoneSpec>().unwrap())
            .unwrap();
        assert!((utc.julian_day - 2_460_304.0).abs() < 1e-9);
        assert!((utc.julian_day - tokyo.julian_day - 9.0 / 24.0).abs() < 1e-9);
        assert_eq!(tokyo.timezone, "Asia/Tokyo");
    }

    // Compile-time assertion: ChartBuilder must be Send + Sync.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<ChartBuilder>();
        }
    };
}
