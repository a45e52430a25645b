//! House cusps from sidereal time, obliquity and geographic latitude.
//!
//! The angles come in closed form:
//! - MC  = atan2(sin RAMC, cos RAMC · cos ε)
//! - Asc = atan2(cos RAMC, −(sin RAMC · cos ε + tan φ · sin ε))
//!
//! Placidus cusps 11, 12, 2 and 3 are the ecliptic points whose right
//! ascension equals `base + f · DSA(δ)`, where DSA is the point's own
//! diurnal semi-arc. Since δ depends on the unknown longitude, each cusp is
//! solved with Newton's method in longitude. Cusps 5, 6, 8 and 9 are the
//! opposites.
//!
//! Beyond the polar circles some ecliptic points never rise or set and the
//! semi-arcs are undefined. The solver then fails with
//! [`HouseError::ConvergenceFailure`] unless [`PolarFallback::Porphyry`] is
//! configured.

use std::fmt;

use natal_frames::{mean_obliquity_deg, normalize_deg, signed_diff_deg};
use natal_time::{AstronomicalMoment, jd_to_centuries};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::HouseError;

pub const DEFAULT_MAX_ITERATIONS: u32 = 50;
pub const DEFAULT_TOLERANCE_DEG: f64 = 1e-7;
pub const DEFAULT_POLAR_LIMIT_DEG: f64 = 66.5;

/// `(cusp, base offset from RAMC in degrees, semi-arc fraction)`.
const PLACIDUS_CUSPS: [(u8, f64, f64); 4] = [
    (11, 0.0, 1.0 / 3.0),
    (12, 0.0, 2.0 / 3.0),
    (2, 60.0, 2.0 / 3.0),
    (3, 120.0, 1.0 / 3.0),
];

/// House system that produced a [`HouseSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseSystem {
    Placidus,
    Porphyry,
}

impl HouseSystem {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Placidus => "Placidus",
            Self::Porphyry => "Porphyry",
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do where Placidus has no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarFallback {
    /// Fail with a convergence error.
    #[default]
    None,
    /// Trisect the quadrants between the angles instead.
    Porphyry,
}

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    /// Newton iteration cap per cusp.
    pub max_iterations: u32,
    /// Stop once a Newton step is smaller than this, degrees.
    pub tolerance_deg: f64,
    /// Placidus is refused beyond this absolute latitude.
    pub polar_limit_deg: f64,
    pub polar_fallback: PolarFallback,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            polar_limit_deg: DEFAULT_POLAR_LIMIT_DEG,
            polar_fallback: PolarFallback::None,
        }
    }
}

impl HouseConfig {
    pub fn validate(&self) -> Result<(), HouseError> {
        if self.max_iterations == 0 {
            return Err(HouseError::InvalidConfig(
                "max_iterations must be greater than zero",
            ));
        }
        if !(self.tolerance_deg.is_finite() && self.tolerance_deg > 0.0 && self.tolerance_deg < 1.0)
        {
            return Err(HouseError::InvalidConfig(
                "tolerance_deg must be in (0, 1)",
            ));
        }
        if !(self.polar_limit_deg > 0.0 && self.polar_limit_deg < 90.0) {
            return Err(HouseError::InvalidConfig(
                "polar_limit_deg must be in (0, 90)",
            ));
        }
        Ok(())
    }
}

/// One house cusp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseCusp {
    /// House number, 1–12.
    pub index: u8,
    /// Ecliptic longitude, degrees [0, 360).
    pub longitude: f64,
}

/// Twelve cusps with the angles they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseSet {
    pub system: HouseSystem,
    pub cusps: [HouseCusp; 12],
    pub ascendant: f64,
    pub midheaven: f64,
    pub ramc_deg: f64,
    pub obliquity_deg: f64,
}

impl HouseSet {
    fn from_longitudes(
        system: HouseSystem,
        longitudes: [f64; 12],
        ramc_deg: f64,
        obliquity_deg: f64,
    ) -> Self {
        let cusps = std::array::from_fn(|i| HouseCusp {
            index: (i + 1) as u8,
            longitude: normalize_deg(longitudes[i]),
        });
        Self {
            system,
            ascendant: normalize_deg(longitudes[0]),
            midheaven: normalize_deg(longitudes[9]),
            cusps,
            ramc_deg,
            obliquity_deg,
        }
    }

    /// Longitude of cusp `index` (1–12).
    pub fn cusp(&self, index: u8) -> Option<f64> {
        match index {
            1..=12 => Some(self.cusps[usize::from(index - 1)].longitude),
            _ => None,
        }
    }

    pub fn descendant(&self) -> f64 {
        normalize_deg(self.ascendant + 180.0)
    }

    pub fn imum_coeli(&self) -> f64 {
        normalize_deg(self.midheaven + 180.0)
    }

    pub fn longitudes(&self) -> [f64; 12] {
        self.cusps.map(|c| c.longitude)
    }

    /// House (1–12) containing an ecliptic longitude.
    ///
    /// Each house spans from its own cusp, inclusive, to the next cusp.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = normalize_deg(longitude);
        for i in 0..12 {
            let start = self.cusps[i].longitude;
            let end = self.cusps[(i + 1) % 12].longitude;
            if arc_forward(start, lon) < arc_forward(start, end) {
                return self.cusps[i].index;
            }
        }
        12
    }
}

/// Forward arc from `a` to `b` in degrees, [0, 360).
fn arc_forward(a: f64, b: f64) -> f64 {
    normalize_deg(b - a)
}

/// Midheaven longitude in degrees.
pub fn midheaven_deg(ramc_deg: f64, obliquity_deg: f64) -> f64 {
    let ramc = ramc_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    normalize_deg(f64::atan2(ramc.sin(), ramc.cos() * eps.cos()).to_degrees())
}

/// Ascendant longitude in degrees.
pub fn ascendant_deg(ramc_deg: f64, obliquity_deg: f64, latitude_deg: f64) -> f64 {
    let ramc = ramc_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();
    let y = ramc.cos();
    let x = -(ramc.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_deg(f64::atan2(y, x).to_degrees())
}

/// Ecliptic longitude (β = 0) with the given right ascension, degrees.
fn longitude_of_ra(ra_deg: f64, obliquity_deg: f64) -> f64 {
    let ra = ra_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    normalize_deg(f64::atan2(ra.sin(), ra.cos() * eps.cos()).to_degrees())
}

/// Computes house cusps for a moment and latitude.
#[derive(Debug, Clone, Default)]
pub struct HouseSolver {
    config: HouseConfig,
}

impl HouseSolver {
    pub fn new(config: HouseConfig) -> Result<Self, HouseError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    /// Cusps for the moment's local sidereal time at `latitude`.
    ///
    /// Uses the mean obliquity of date at the moment's TT.
    pub fn solve(
        &self,
        moment: &AstronomicalMoment,
        latitude: f64,
    ) -> Result<HouseSet, HouseError> {
        let obliquity = mean_obliquity_deg(jd_to_centuries(moment.jd_tt));
        self.solve_ramc(moment.ramc_deg(), obliquity, latitude)
    }

    /// Cusps for an explicit RAMC and obliquity, degrees.
    pub fn solve_ramc(
        &self,
        ramc_deg: f64,
        obliquity_deg: f64,
        latitude: f64,
    ) -> Result<HouseSet, HouseError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(HouseError::InvalidInput {
                field: "latitude",
                value: latitude,
            });
        }
        if !ramc_deg.is_finite() {
            return Err(HouseError::InvalidInput {
                field: "ramc",
                value: ramc_deg,
            });
        }
        if !(obliquity_deg.is_finite() && obliquity_deg.abs() < 45.0) {
            return Err(HouseError::InvalidInput {
                field: "obliquity",
                value: obliquity_deg,
            });
        }
        let ramc = normalize_deg(ramc_deg);

        let placidus = if latitude.abs() > self.config.polar_limit_deg {
            Err(HouseError::ConvergenceFailure {
                cusp: None,
                latitude,
                reason: "latitude beyond polar limit",
            })
        } else {
            self.placidus(ramc, obliquity_deg, latitude)
        };

        match (placidus, self.config.polar_fallback) {
            (Ok(set), _) => {
                debug!(
                    ramc,
                    latitude,
                    asc = set.ascendant,
                    mc = set.midheaven,
                    "placidus cusps solved"
                );
                Ok(set)
            }
            (Err(err), PolarFallback::Porphyry) => {
                warn!(latitude, error = %err, "placidus unavailable, using porphyry cusps");
                Ok(porphyry(ramc, obliquity_deg, latitude))
            }
            (Err(err), PolarFallback::None) => Err(err),
        }
    }

    fn placidus(
        &self,
        ramc: f64,
        obliquity_deg: f64,
        latitude: f64,
    ) -> Result<HouseSet, HouseError> {
        let asc = ascendant_deg(ramc, obliquity_deg, latitude);
        let mc = midheaven_deg(ramc, obliquity_deg);

        let mut cusps = [0.0; 12];
        cusps[0] = asc;
        cusps[3] = normalize_deg(mc + 180.0);
        cusps[6] = normalize_deg(asc + 180.0);
        cusps[9] = mc;
        for (cusp, offset, fraction) in PLACIDUS_CUSPS {
            let lon = self.placidus_cusp(cusp, ramc + offset, fraction, obliquity_deg, latitude)?;
            let i = usize::from(cusp - 1);
            cusps[i] = lon;
            cusps[(i + 6) % 12] = normalize_deg(lon + 180.0);
        }

        Ok(HouseSet::from_longitudes(
            HouseSystem::Placidus,
            cusps,
            ramc,
            obliquity_deg,
        ))
    }

    /// Solve `RA(λ) = base + f · DSA(δ(λ))` for λ, degrees.
    ///
    /// The derivative of the residual with respect to λ is
    /// `α' − f · DSA'(δ) · δ'`, with
    /// `α' = cos ε / (cos²λ + cos²ε sin²λ)`,
    /// `δ' = sin ε cos λ / cos δ` and
    /// `DSA' = tan φ sec²δ / √(1 − tan²φ tan²δ)`.
    fn placidus_cusp(
        &self,
        cusp: u8,
        base_deg: f64,
        fraction: f64,
        obliquity_deg: f64,
        latitude: f64,
    ) -> Result<f64, HouseError> {
        let failure = |reason| HouseError::ConvergenceFailure {
            cusp: Some(cusp),
            latitude,
            reason,
        };
        let (sin_e, cos_e) = obliquity_deg.to_radians().sin_cos();
        let tan_phi = latitude.to_radians().tan();

        // Start where the equator-only division would put the cusp.
        let mut lon = longitude_of_ra(base_deg + fraction * 90.0, obliquity_deg);
        for _ in 0..self.config.max_iterations {
            let (sin_l, cos_l) = lon.to_radians().sin_cos();
            let dec = (sin_e * sin_l).asin();
            let x = tan_phi * dec.tan();
            if x.abs() >= 1.0 {
                return Err(failure("semi-arc undefined"));
            }
            let dsa = (-x).acos();
            let ra = f64::atan2(sin_l * cos_e, cos_l).to_degrees();
            let residual = signed_diff_deg(ra, base_deg + fraction * dsa.to_degrees());

            let d_ra = cos_e / (cos_l * cos_l + cos_e * cos_e * sin_l * sin_l);
            let d_dec = sin_e * cos_l / dec.cos();
            let sec_dec = 1.0 / dec.cos();
            let d_dsa = tan_phi * sec_dec * sec_dec / (1.0 - x * x).sqrt();
            let slope = d_ra - fraction * d_dsa * d_dec;
            if !(slope.is_finite() && slope > 0.0) {
                return Err(failure("residual slope vanished"));
            }

            let step = residual / slope;
            lon = normalize_deg(lon - step);
            if step.abs() <= self.config.tolerance_deg {
                return Ok(lon);
            }
        }
        Err(failure("iteration cap reached"))
    }
}

/// Quadrant trisection between the angles.
///
/// Where the Ascendant falls outside the MC→IC half of the ecliptic (inside
/// the polar circles), the opposite point is taken as the Ascendant so the
/// cusps stay in zodiacal order.
fn porphyry(ramc: f64, obliquity_deg: f64, latitude: f64) -> HouseSet {
    let mc = midheaven_deg(ramc, obliquity_deg);
    let mut asc = ascendant_deg(ramc, obliquity_deg, latitude);
    if arc_forward(mc, asc) > 180.0 {
        debug!(asc, mc, "ascendant below the meridian half, flipping");
        asc = normalize_deg(asc + 180.0);
    }
    let ic = normalize_deg(mc + 180.0);
    let upper = arc_forward(mc, asc) / 3.0;
    let lower = arc_forward(asc, ic) / 3.0;

    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[1] = asc + lower;
    cusps[2] = asc + 2.0 * lower;
    cusps[9] = mc;
    cusps[10] = mc + upper;
    cusps[11] = mc + 2.0 * upper;
    for i in [0, 1, 2, 9, 10, 11] {
        cusps[(i + 6) % 12] = cusps[i] + 180.0;
    }
    HouseSet::from_longitudes(HouseSystem::Porphyry, cusps, ramc, obliquity_deg)
}
