//! Geocentric planets from mean Keplerian elements.
//!
//! Elements and rates: Standish, "Keplerian Elements for Approximate
//! Positions of the Major Planets" (JPL), Table 1, valid 1800–2050.
//! Accuracy is roughly an arcminute for the inner planets and a few
//! arcminutes for the outer ones, referred to the J2000 ecliptic.

use natal_frames::{SphericalCoords, cartesian_to_spherical, precess_longitude_deg};

use crate::body::CelestialBody;

/// Light travel time for one AU, in days.
const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Bounded Newton iteration for Kepler's equation.
const KEPLER_MAX_ITERATIONS: usize = 30;
const KEPLER_TOLERANCE_RAD: f64 = 1e-12;

/// Mean orbital elements at J2000 and their rates per Julian century.
///
/// Order: a (AU), e, I (°), L (°), ϖ (°), Ω (°).
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    at_epoch: [f64; 6],
    rates: [f64; 6],
}

impl OrbitalElements {
    const fn new(at_epoch: [f64; 6], rates: [f64; 6]) -> Self {
        Self { at_epoch, rates }
    }
}

#[rustfmt::skip]
const MERCURY: OrbitalElements = OrbitalElements::new(
    [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
    [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
);
#[rustfmt::skip]
const VENUS: OrbitalElements = OrbitalElements::new(
    [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
    [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
);
#[rustfmt::skip]
const EARTH_MOON_BARYCENTRE: OrbitalElements = OrbitalElements::new(
    [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
    [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
);
#[rustfmt::skip]
const MARS: OrbitalElements = OrbitalElements::new(
    [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
    [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
);
#[rustfmt::skip]
const JUPITER: OrbitalElements = OrbitalElements::new(
    [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
    [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
);
#[rustfmt::skip]
const SATURN: OrbitalElements = OrbitalElements::new(
    [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
    [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
);
#[rustfmt::skip]
const URANUS: OrbitalElements = OrbitalElements::new(
    [19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03],
    [-0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89],
);
#[rustfmt::skip]
const NEPTUNE: OrbitalElements = OrbitalElements::new(
    [30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74],
    [0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64],
);
#[rustfmt::skip]
const PLUTO: OrbitalElements = OrbitalElements::new(
    [39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84],
    [-0.000_315_96, 0.000_051_70, 0.000_048_18, 145.207_805_15, -0.040_629_42, -0.011_834_82],
);

fn elements_for(body: CelestialBody) -> Option<&'static OrbitalElements> {
    match body {
        CelestialBody::Mercury => Some(&MERCURY),
        CelestialBody::Venus => Some(&VENUS),
        CelestialBody::Mars => Some(&MARS),
        CelestialBody::Jupiter => Some(&JUPITER),
        CelestialBody::Saturn => Some(&SATURN),
        CelestialBody::Uranus => Some(&URANUS),
        CelestialBody::Neptune => Some(&NEPTUNE),
        CelestialBody::Pluto => Some(&PLUTO),
        _ => None,
    }
}

/// Whether the body has Keplerian elements in this model.
pub fn has_elements(body: CelestialBody) -> bool {
    elements_for(body).is_some()
}

/// Solve `E − e sin E = M` for the eccentric anomaly (radians).
pub fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ea = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (mean_anomaly - (ea - e * ea.sin())) / (1.0 - e * ea.cos());
        ea += delta;
        if delta.abs() < KEPLER_TOLERANCE_RAD {
            break;
        }
    }
    ea
}

/// Heliocentric position in the J2000 ecliptic frame, AU.
fn heliocentric(el: &OrbitalElements, t: f64) -> [f64; 3] {
    let [a, e, incl, mean_lon, peri, node] =
        std::array::from_fn(|k| el.at_epoch[k] + el.rates[k] * t);

    let omega = (peri - node).to_radians();
    let m = (mean_lon - peri + 180.0).rem_euclid(360.0) - 180.0;
    let ea = eccentric_anomaly(m.to_radians(), e);

    // Position in the orbital plane, x toward perihelion.
    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.to_radians().sin_cos();
    let (si, ci) = incl.to_radians().sin_cos();
    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Geometric geocentric position of a planet, corrected for light time
/// and referred to the mean equinox of date. Distance in AU.
///
/// Returns `None` for bodies without Keplerian elements.
pub fn planet_geocentric(body: CelestialBody, t: f64) -> Option<SphericalCoords> {
    let el = elements_for(body)?;
    let earth = heliocentric(&EARTH_MOON_BARYCENTRE, t);

    let first = sub(&heliocentric(el, t), &earth);
    let tau_centuries = LIGHT_TIME_DAYS_PER_AU * norm(&first) / 36_525.0;
    let geo = sub(&heliocentric(el, t - tau_centuries), &earth);

    let mut s = cartesian_to_spherical(&geo);
    s.lon_deg = precess_longitude_deg(s.lon_deg, t);
    Some(s)
}
