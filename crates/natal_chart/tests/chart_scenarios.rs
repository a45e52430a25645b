//! End-to-end chart scenarios over a tabulated analytic ephemeris.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use natal_chart::{
    AspectMatcher, ChartBuilder, ChartConfig, ChartRequest, ErrorKind, HouseConfig, HouseSolver,
    HouseSystem, PlanetsResponse, PolarFallback,
};
use natal_ephem::{CelestialBody, Ephemeris, EphemerisConfig};
use natal_time::{FixedZoneLookup, TimeConfig, TimeResolver, ZoneSpec};

/// 2023-11-25 to 2024-04-23.
fn ephemeris() -> Arc<Ephemeris> {
    let config = EphemerisConfig {
        start_jd: 2_460_273.5,
        end_jd: 2_460_423.5,
        ..EphemerisConfig::default()
    };
    Arc::new(Ephemeris::new(&config).unwrap())
}

fn builder_with(zone: FixedZoneLookup, houses: HouseConfig, config: ChartConfig) -> ChartBuilder {
    ChartBuilder::new(
        ephemeris(),
        TimeResolver::with_lookup(Arc::new(zone), TimeConfig::default()),
        HouseSolver::new(houses).unwrap(),
        AspectMatcher::default(),
        config,
    )
    .unwrap()
}

fn builder(zone: &str) -> ChartBuilder {
    builder_with(
        FixedZoneLookup::new(zone),
        HouseConfig::default(),
        ChartConfig::default(),
    )
}

fn christmas(lat: f64, lon: f64) -> ChartRequest {
    ChartRequest::parse("2023-12-25", Some("12:00:00"), lat, lon).unwrap()
}

#[test]
fn christmas_planets_response() {
    let chart = builder("UTC").build(&christmas(51.5, 0.0)).unwrap();
    let response = PlanetsResponse::from(&chart);

    assert_eq!(response.date, "2023-12-25");
    assert_eq!(response.time, "12:00:00");
    assert_eq!(response.timezone, "UTC");
    assert!((response.julian_day - 2_460_304.0).abs() < 1e-9);
    assert!((response.julian_day - 2_460_303.0).abs() <= 1.0);

    let names: Vec<_> = response.planets.0.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        [
            "Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
            "Pluto", "TrueNode", "MeanNode", "Lilith"
        ]
    );

    let sun = response.planets.get("Sun").unwrap();
    assert!((sun.longitude - 273.1).abs() < 0.5, "Sun λ = {}", sun.longitude);
    assert_eq!(sun.sign.name(), "Capricorn");
    assert!(sun.latitude.abs() < 1e-6);
    assert!(sun.speed_latitude.abs() < 1e-6);
    assert!(sun.speed_distance.abs() < 1e-3);
    assert!(sun.phase.is_none());

    // Mercury stations direct on 2024-01-01.
    assert!(response.planets.get("Mercury").unwrap().retrograde);
    assert!(response.planets.get("MeanNode").unwrap().retrograde);

    let moon = response.planets.get("Moon").unwrap();
    let phase = moon.phase.as_ref().unwrap();
    assert!(phase.angle > 140.0 && phase.angle < 180.0, "angle {}", phase.angle);

    let house_keys: Vec<_> = response.houses.0.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        house_keys,
        ["1", "10", "4", "7", "2", "3", "5", "6", "8", "9", "11", "12"]
    );
    assert_eq!(response.houses.get("1").unwrap().name, Some("Ascendant"));
    assert_eq!(response.houses.get("10").unwrap().name, Some("MC"));
    assert_eq!(response.houses.get("2").unwrap().name, None);
    for (_, house) in &response.houses.0 {
        assert_eq!(house.sign_ruler, house.sign.ruler());
        assert!(house.ruler_position.is_some());
    }

    for aspect in &response.aspects {
        assert!(aspect.orb >= 0.0 && aspect.orb <= 8.0, "{aspect:?}");
        assert_ne!(aspect.planet1, aspect.planet2);
    }
}

#[test]
fn response_serializes_to_json() {
    let chart = builder("UTC").build(&christmas(40.7128, -74.006)).unwrap();
    let json = serde_json::to_string(&PlanetsResponse::from(&chart)).unwrap();
    assert!(json.starts_with(r#"{"date":"2023-12-25","time":"12:00:00","timezone":"UTC""#));
    assert!(json.contains(r#""longitude_formatted":"#));
    assert!(json.contains(r#""houses":{"1":{"#));
}

#[test]
fn cusps_cyclic_in_built_chart() {
    let b = builder("UTC");
    for (lat, lon) in [(51.5, 0.0), (-33.87, 151.21), (19.43, -99.13), (64.1, -21.9)] {
        let chart = b.build(&christmas(lat, lon)).unwrap();
        let cusps = chart.houses.longitudes();
        let total: f64 = (0..12)
            .map(|i| (cusps[(i + 1) % 12] - cusps[i]).rem_euclid(360.0))
            .sum();
        assert!((total - 360.0).abs() < 1e-6, "lat {lat}: {cusps:?}");
        for p in &chart.placements {
            assert!((1..=12).contains(&p.house));
        }
    }
}

#[test]
fn civil_time_in_named_zone() {
    // 14:30 EST on 2024-03-05 is 19:30 UTC.
    let chart = builder("America/New_York")
        .build(&ChartRequest::parse("2024-03-05", Some("14:30:00"), 40.7128, -74.006).unwrap())
        .unwrap();
    assert_eq!(chart.moment.timezone, "America/New_York");
    assert_eq!(chart.moment.utc_offset_seconds, -5 * 3600);
    let expected = 2_460_374.5 + 19.5 / 24.0;
    assert!((chart.moment.jd_ut - expected).abs() < 1e-9);
}

#[test]
fn aspects_independent_of_body_order() {
    let forward = builder("UTC").build(&christmas(48.85, 2.35)).unwrap();
    let mut reversed_bodies = ChartConfig::default().bodies;
    reversed_bodies.reverse();
    let reversed = builder_with(
        FixedZoneLookup::new("UTC"),
        HouseConfig::default(),
        ChartConfig {
            bodies: reversed_bodies,
        },
    )
    .build(&christmas(48.85, 2.35))
    .unwrap();

    let mut a = forward.aspects.clone();
    let mut b = reversed.aspects.clone();
    let key = |x: &natal_chart::Aspect| (x.a, x.b);
    a.sort_by_key(key);
    b.sort_by_key(key);
    assert_eq!(a, b);
}

#[test]
fn polar_latitude_fails_without_fallback() {
    let err = builder("UTC").build(&christmas(69.65, 18.96)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConvergenceFailure);
}

#[test]
fn polar_latitude_with_porphyry_fallback() {
    let b = builder_with(
        FixedZoneLookup::new("UTC"),
        HouseConfig {
            polar_fallback: PolarFallback::Porphyry,
            ..HouseConfig::default()
        },
        ChartConfig::default(),
    );
    let chart = b.build(&christmas(69.65, 18.96)).unwrap();
    assert_eq!(chart.houses.system, HouseSystem::Porphyry);
}

#[test]
fn outside_coverage_is_unavailable() {
    let req = ChartRequest::parse("1999-01-01", None, 10.0, 10.0).unwrap();
    let err = builder("UTC").build(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EphemerisDataUnavailable);
}

#[test]
fn unmodelled_body_is_unavailable() {
    let b = builder_with(
        FixedZoneLookup::new("UTC"),
        HouseConfig::default(),
        ChartConfig {
            bodies: vec![CelestialBody::Sun, CelestialBody::Chiron],
        },
    );
    let err = b.build(&christmas(10.0, 10.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EphemerisDataUnavailable);
}

#[test]
fn open_ocean_fails_timezone_resolution() {
    let b = builder_with(
        FixedZoneLookup::none(),
        HouseConfig::default(),
        ChartConfig::default(),
    );
    let err = b.build(&christmas(-40.0, -130.0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimezoneResolutionFailure);
}

#[test]
fn sun_report_for_utc_noon() {
    let b = builder("UTC");
    let report = b
        .sun_report(
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            &ZoneSpec::fixed_hours(0.0).unwrap(),
        )
        .unwrap();
    assert!((report.julian_day - 2_460_303.0).abs() <= 1.0);
    assert_eq!(report.timezone, "0");
    let sun = report.sun_position;
    assert!((sun.longitude - 273.1).abs() < 0.5);
    assert!(sun.latitude.abs() < 1e-6);
    assert!(sun.speed_latitude.abs() < 1e-6);
    assert!(sun.speed_distance.abs() < 1e-3);
}
