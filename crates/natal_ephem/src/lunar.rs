//! Geocentric Moon and the lunar points (nodes, mean apogee).
//!
//! Main periodic terms of ELP-2000/82 as tabulated in Meeus,
//! *Astronomical Algorithms* (2nd ed.), Chapter 47: about 10″ in
//! longitude and 4″ in latitude. Positions refer to the mean equinox
//! of date.

use natal_frames::{SphericalCoords, normalize_deg};

/// Kilometres per astronomical unit (IAU 2012).
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Mean lunar arguments in degrees at `t` centuries of TT since J2000.
#[derive(Debug, Clone, Copy)]
struct LunarArguments {
    /// Mean longitude L′.
    mean_lon: f64,
    /// Mean elongation D.
    elongation: f64,
    /// Sun's mean anomaly M.
    sun_anomaly: f64,
    /// Moon's mean anomaly M′.
    moon_anomaly: f64,
    /// Argument of latitude F.
    arg_latitude: f64,
    /// Eccentricity factor E for terms in M.
    ecc_factor: f64,
}

impl LunarArguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        Self {
            mean_lon: 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
                - t4 / 65_194_000.0,
            elongation: 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2
                + t3 / 545_868.0
                - t4 / 113_065_000.0,
            sun_anomaly: 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2
                + t3 / 24_490_000.0,
            moon_anomaly: 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2
                + t3 / 69_699.0
                - t4 / 14_712_000.0,
            arg_latitude: 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2
                - t3 / 3_526_000.0
                + t4 / 863_310_000.0,
            ecc_factor: 1.0 - 0.002_516 * t - 0.000_007_4 * t2,
        }
    }

    /// `sin`/`cos` argument for multipliers `[D, M, M′, F]`, radians, with
    /// the eccentricity weight for the M multiplier.
    fn argument(&self, k: &[i8; 4]) -> (f64, f64) {
        let angle = f64::from(k[0]) * self.elongation
            + f64::from(k[1]) * self.sun_anomaly
            + f64::from(k[2]) * self.moon_anomaly
            + f64::from(k[3]) * self.arg_latitude;
        let weight = match k[1].unsigned_abs() {
            0 => 1.0,
            1 => self.ecc_factor,
            _ => self.ecc_factor * self.ecc_factor,
        };
        (angle.to_radians(), weight)
    }
}

/// Longitude (Σl, 1e-6 °) and distance (Σr, 1e-3 km) terms:
/// `[D, M, M′, F]`, Σl, Σr.
#[rustfmt::skip]
static LON_DIST_TERMS: [([i8; 4], i32, i32); 60] = [
    ([0, 0, 1, 0], 6_288_774, -20_905_355),
    ([2, 0, -1, 0], 1_274_027, -3_699_111),
    ([2, 0, 0, 0], 658_314, -2_955_968),
    ([0, 0, 2, 0], 213_618, -569_925),
    ([0, 1, 0, 0], -185_116, 48_888),
    ([0, 0, 0, 2], -114_332, -3_149),
    ([2, 0, -2, 0], 58_793, 246_158),
    ([2, -1, -1, 0], 57_066, -152_138),
    ([2, 0, 1, 0], 53_322, -170_733),
    ([2, -1, 0, 0], 45_758, -204_586),
    ([0, 1, -1, 0], -40_923, -129_620),
    ([1, 0, 0, 0], -34_720, 108_743),
    ([0, 1, 1, 0], -30_383, 104_755),
    ([2, 0, 0, -2], 15_327, 10_321),
    ([0, 0, 1, 2], -12_528, 0),
    ([0, 0, 1, -2], 10_980, 79_661),
    ([4, 0, -1, 0], 10_675, -34_782),
    ([0, 0, 3, 0], 10_034, -23_210),
    ([4, 0, -2, 0], 8_548, -21_636),
    ([2, 1, -1, 0], -7_888, 24_208),
    ([2, 1, 0, 0], -6_766, 30_824),
    ([1, 0, -1, 0], -5_163, -8_379),
    ([1, 1, 0, 0], 4_987, -16_675),
    ([2, -1, 1, 0], 4_036, -12_831),
    ([2, 0, 2, 0], 3_994, -10_445),
    ([4, 0, 0, 0], 3_861, -11_650),
    ([2, 0, -3, 0], 3_665, 14_403),
    ([0, 1, -2, 0], -2_689, -7_003),
    ([2, 0, -1, 2], -2_602, 0),
    ([2, -1, -2, 0], 2_390, 10_056),
    ([1, 0, 1, 0], -2_348, 6_322),
    ([2, -2, 0, 0], 2_236, -9_884),
    ([0, 1, 2, 0], -2_120, 5_751),
    ([0, 2, 0, 0], -2_069, 0),
    ([2, -2, -1, 0], 2_048, -4_950),
    ([2, 0, 1, -2], -1_773, 4_130),
    ([2, 0, 0, 2], -1_595, 0),
    ([4, -1, -1, 0], 1_215, -3_958),
    ([0, 0, 2, 2], -1_110, 0),
    ([3, 0, -1, 0], -892, 3_258),
    ([2, 1, 1, 0], -810, 2_616),
    ([4, -1, -2, 0], 759, -1_897),
    ([0, 2, -1, 0], -713, -2_117),
    ([2, 2, -1, 0], -700, 2_354),
    ([2, 1, -2, 0], 691, 0),
    ([2, -1, 0, -2], 596, 0),
    ([4, 0, 1, 0], 549, -1_423),
    ([0, 0, 4, 0], 537, -1_117),
    ([4, -1, 0, 0], 520, -1_571),
    ([1, 0, -2, 0], -487, -1_739),
    ([2, 1, 0, -2], -399, 0),
    ([0, 0, 2, -2], -381, -4_421),
    ([1, 1, 1, 0], 351, 0),
    ([3, 0, -2, 0], -340, 0),
    ([4, 0, -3, 0], 330, 0),
    ([2, -1, 2, 0], 327, 0),
    ([0, 2, 1, 0], -323, 1_165),
    ([1, 1, -1, 0], 299, 0),
    ([2, 0, 3, 0], 294, 0),
    ([2, 0, -1, -2], 0, 8_752),
];

/// Latitude (Σb, 1e-6 °) terms: `[D, M, M′, F]`, Σb.
#[rustfmt::skip]
static LAT_TERMS: [([i8; 4], i32); 60] = [
    ([0, 0, 0, 1], 5_128_122),
    ([0, 0, 1, 1], 280_602),
    ([0, 0, 1, -1], 277_693),
    ([2, 0, 0, -1], 173_237),
    ([2, 0, -1, 1], 55_413),
    ([2, 0, -1, -1], 46_271),
    ([2, 0, 0, 1], 32_573),
    ([0, 0, 2, 1], 17_198),
    ([2, 0, 1, -1], 9_266),
    ([0, 0, 2, -1], 8_822),
    ([2, -1, 0, -1], 8_216),
    ([2, 0, -2, -1], 4_324),
    ([2, 0, 1, 1], 4_200),
    ([2, 1, 0, -1], -3_359),
    ([2, -1, -1, 1], 2_463),
    ([2, -1, 0, 1], 2_211),
    ([2, -1, -1, -1], 2_065),
    ([0, 1, -1, -1], -1_870),
    ([4, 0, -1, -1], 1_828),
    ([0, 1, 0, 1], -1_794),
    ([0, 0, 0, 3], -1_749),
    ([0, 1, -1, 1], -1_565),
    ([1, 0, 0, 1], -1_491),
    ([0, 1, 1, 1], -1_475),
    ([0, 1, 1, -1], -1_410),
    ([0, 1, 0, -1], -1_344),
    ([1, 0, 0, -1], -1_335),
    ([0, 0, 3, 1], 1_107),
    ([4, 0, 0, -1], 1_021),
    ([4, 0, -1, 1], 833),
    ([0, 0, 1, -3], 777),
    ([4, 0, -2, 1], 671),
    ([2, 0, 0, -3], 607),
    ([2, 0, 2, -1], 596),
    ([2, -1, 1, -1], 491),
    ([2, 0, -2, 1], -451),
    ([0, 0, 3, -1], 439),
    ([2, 0, 2, 1], 422),
    ([2, 0, -3, -1], 421),
    ([2, 1, -1, 1], -366),
    ([2, 1, 0, 1], -351),
    ([4, 0, 0, 1], 331),
    ([2, -1, 1, 1], 315),
    ([2, -2, 0, -1], 302),
    ([0, 0, 1, 3], -283),
    ([2, 1, 1, -1], -229),
    ([1, 1, 0, -1], 223),
    ([1, 1, 0, 1], 223),
    ([0, 1, -2, -1], -220),
    ([2, 1, -1, -1], -220),
    ([1, 0, 1, 1], -185),
    ([2, -1, -2, -1], 181),
    ([0, 1, 2, 1], -177),
    ([4, 0, -2, -1], 176),
    ([4, -1, -1, -1], 166),
    ([1, 0, 1, -1], -164),
    ([4, 0, 1, -1], 132),
    ([1, 0, -1, -1], -119),
    ([4, -1, 0, -1], 115),
    ([2, -2, 0, 1], 107),
];

/// Geometric geocentric Moon, mean equinox of date. Distance in AU.
pub fn moon_geocentric(t: f64) -> SphericalCoords {
    let args = LunarArguments::at(t);

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for (k, l, r) in &LON_DIST_TERMS {
        let (angle, weight) = args.argument(k);
        sum_l += weight * f64::from(*l) * angle.sin();
        sum_r += weight * f64::from(*r) * angle.cos();
    }
    let mut sum_b = 0.0;
    for (k, b) in &LAT_TERMS {
        let (angle, weight) = args.argument(k);
        sum_b += weight * f64::from(*b) * angle.sin();
    }

    // Venus, Jupiter and flattening corrections.
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let lp = args.mean_lon.to_radians();
    let f = args.arg_latitude.to_radians();
    let mp = args.moon_anomaly.to_radians();

    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    SphericalCoords {
        lon_deg: normalize_deg(args.mean_lon + sum_l / 1e6),
        lat_deg: sum_b / 1e6,
        distance: (385_000.56 + sum_r / 1000.0) / KM_PER_AU,
    }
}

/// Mean longitude of the Moon's ascending node, degrees [0, 360).
pub fn mean_node_deg(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    normalize_deg(
        125.044_547_9 - 1934.136_289_1 * t + 0.002_075_4 * t2 + t3 / 467_441.0
            - t3 * t / 60_616_000.0,
    )
}

/// True ascending node: mean node plus its five largest periodic terms,
/// degrees [0, 360).
pub fn true_node_deg(t: f64) -> f64 {
    // [D, M, M′, F] multipliers and amplitude in degrees.
    #[rustfmt::skip]
    static TERMS: [([i8; 4], f64); 5] = [
        ([2, 0, 0, -2], -1.4979),
        ([0, 1, 0, 0], -0.1500),
        ([2, 0, 0, 0], -0.1226),
        ([0, 0, 0, 2], 0.1176),
        ([0, 0, 2, -2], -0.0801),
    ];

    let args = LunarArguments::at(t);
    let correction: f64 = TERMS
        .iter()
        .map(|(k, amplitude)| amplitude * args.argument(k).0.sin())
        .sum();
    normalize_deg(mean_node_deg(t) + correction)
}

/// Mean lunar apogee (Black Moon Lilith), degrees [0, 360).
///
/// Mean perigee from Meeus 47.7 plus 180°.
pub fn mean_apogee_deg(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let perigee = 83.353_246_5 + 4069.013_728_7 * t - 0.010_320_0 * t2 - t3 / 80_053.0
        + t3 * t / 18_999_000.0;
    normalize_deg(perigee + 180.0)
}
