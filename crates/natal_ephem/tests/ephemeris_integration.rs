//! Integration tests for the tabulated analytic ephemeris.

use natal_ephem::{
    AnalyticModel, CelestialBody, Ephemeris, EphemerisConfig, EphemerisError, EphemerisTable,
};

/// 2023-12-01 to 2024-01-31.
fn winter_config() -> EphemerisConfig {
    EphemerisConfig {
        start_jd: 2_460_279.5,
        end_jd: 2_460_340.5,
        ..EphemerisConfig::default()
    }
}

fn winter() -> Ephemeris {
    Ephemeris::new(&winter_config()).unwrap()
}

/// 2023-12-25 12:00 UT plus ΔT.
const CHRISTMAS_TT: f64 = 2_460_304.0 + 73.6 / 86_400.0;

#[test]
fn sun_christmas_2023() {
    let sun = winter().position(CHRISTMAS_TT, CelestialBody::Sun).unwrap();
    assert!((sun.longitude - 273.1).abs() < 0.5, "λ = {}", sun.longitude);
    assert!(sun.latitude.abs() < 1e-9);
    assert!(sun.speed_latitude.abs() < 1e-6);
    assert!(sun.speed_distance.abs() < 1e-4, "dR/dt = {}", sun.speed_distance);
    assert!((sun.speed_longitude - 1.019).abs() < 0.01, "dλ/dt = {}", sun.speed_longitude);
    assert!((sun.distance - 0.9835).abs() < 0.001, "R = {}", sun.distance);
}

#[test]
fn longitudes_normalized_for_all_bodies() {
    let eph = winter();
    for body in eph.table().bodies().collect::<Vec<_>>() {
        let mut jd = 2_460_280.0;
        while jd < 2_460_340.0 {
            let p = eph.position(jd, body).unwrap();
            assert!((0.0..360.0).contains(&p.longitude), "{body} at {jd}: {}", p.longitude);
            jd += 0.37;
        }
    }
}

#[test]
fn moon_speed_realistic() {
    let eph = winter();
    let mut jd = 2_460_285.0;
    while jd < 2_460_335.0 {
        let moon = eph.position(jd, CelestialBody::Moon).unwrap();
        assert!(
            (11.5..15.5).contains(&moon.speed_longitude),
            "Moon dλ/dt = {} at {jd}",
            moon.speed_longitude
        );
        jd += 1.3;
    }
}

#[test]
fn mercury_retrograde_december_2023() {
    // Retrograde from Dec 13 to Jan 1.
    let eph = winter();
    let mid = eph.position(2_460_301.5, CelestialBody::Mercury).unwrap();
    assert!(mid.is_retrograde(), "dλ/dt = {}", mid.speed_longitude);
    let after = eph.position(2_460_330.5, CelestialBody::Mercury).unwrap();
    assert!(!after.is_retrograde());
}

#[test]
fn nodes_move_backwards_on_average() {
    let eph = winter();
    let mean = eph.position(CHRISTMAS_TT, CelestialBody::MeanNode).unwrap();
    assert!((mean.speed_longitude + 0.0529).abs() < 0.001, "{}", mean.speed_longitude);
    let lilith = eph.position(CHRISTMAS_TT, CelestialBody::MeanApogee).unwrap();
    assert!((lilith.speed_longitude - 0.1114).abs() < 0.001);
}

#[test]
fn interpolation_matches_model_between_samples() {
    let eph = winter();
    for body in [CelestialBody::Moon, CelestialBody::Mercury, CelestialBody::TrueNode] {
        let jd = 2_460_310.5 + 0.5;
        let p = eph.position(jd, body).unwrap();
        let direct = AnalyticModel.coords(body, jd).unwrap();
        let d = natal_frames::signed_diff_deg(p.longitude, direct.lon_deg);
        assert!(d.abs() < 1e-4, "{body}: interpolated {} vs {}", p.longitude, direct.lon_deg);
    }
}

#[test]
fn coverage_edges() {
    let eph = winter();
    let (start, end) = eph.coverage(CelestialBody::Sun).unwrap();
    assert_eq!(start, 2_460_279.5);
    assert!(end >= 2_460_340.5);
    assert!(eph.position(start, CelestialBody::Sun).is_ok());
    assert!(eph.position(end, CelestialBody::Sun).is_ok());
    match eph.position(2_451_545.0, CelestialBody::Sun) {
        Err(EphemerisError::OutOfRange { body, jd, .. }) => {
            assert_eq!(body, CelestialBody::Sun);
            assert_eq!(jd, 2_451_545.0);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
}

#[test]
fn table_file_roundtrip() {
    let eph = winter();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("winter.eph");
    eph.table().save(&path).unwrap();

    let loaded = Ephemeris::new(&EphemerisConfig {
        table_path: Some(path),
        ..EphemerisConfig::default()
    })
    .unwrap();
    for body in [CelestialBody::Sun, CelestialBody::Moon, CelestialBody::Pluto] {
        let a = eph.position(CHRISTMAS_TT, body).unwrap();
        let b = loaded.position(CHRISTMAS_TT, body).unwrap();
        assert!((a.longitude - b.longitude).abs() < 1e-7, "{body}");
        assert!((a.speed_longitude - b.speed_longitude).abs() < 1e-6, "{body}");
    }
}

#[test]
fn missing_table_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EphemerisTable::load(&dir.path().join("absent.eph")).unwrap_err();
    assert!(matches!(err, EphemerisError::Io { .. }));
}
