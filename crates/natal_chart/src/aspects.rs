//! Angular relationships between chart points.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use natal_ephem::CelestialBody;
use natal_frames::signed_diff_deg;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::ChartError;

/// Largest accepted orb, degrees.
pub const MAX_ORB_DEG: f64 = 30.0;

/// Recognised aspect kinds, ordered by reference angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AspectKind {
    Conjunction,
    SemiSextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

pub const ALL_ASPECTS: [AspectKind; 7] = [
    AspectKind::Conjunction,
    AspectKind::SemiSextile,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Quincunx,
    AspectKind::Opposition,
];

impl AspectKind {
    /// Reference separation in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::SemiSextile => 30.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Quincunx => 150.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::SemiSextile => "semi-sextile",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Quincunx => "quincunx",
            Self::Opposition => "opposition",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        ALL_ASPECTS
            .iter()
            .copied()
            .find(|k| k.name() == key)
            .ok_or_else(|| ChartError::invalid("aspect", s))
    }
}

/// The four chart angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartAngle {
    Ascendant,
    Midheaven,
    ImumCoeli,
    Descendant,
}

impl ChartAngle {
    pub const ALL: [ChartAngle; 4] = [
        Self::Ascendant,
        Self::Midheaven,
        Self::ImumCoeli,
        Self::Descendant,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascendant => "Ascendant",
            Self::Midheaven => "MC",
            Self::ImumCoeli => "IC",
            Self::Descendant => "DSC",
        }
    }

    /// The house whose cusp this angle is.
    pub const fn house(self) -> u8 {
        match self {
            Self::Ascendant => 1,
            Self::ImumCoeli => 4,
            Self::Descendant => 7,
            Self::Midheaven => 10,
        }
    }
}

/// Anything that can take part in an aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartPoint {
    Body(CelestialBody),
    Angle(ChartAngle),
}

impl ChartPoint {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Body(b) => b.name(),
            Self::Angle(a) => a.name(),
        }
    }

    pub const fn is_angle(self) -> bool {
        matches!(self, Self::Angle(_))
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A point's longitude and, when known, its daily motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPosition {
    pub point: ChartPoint,
    /// Ecliptic longitude, degrees.
    pub longitude: f64,
    /// Degrees/day.
    pub speed: Option<f64>,
}

/// One detected aspect.
///
/// `a` sorts before `b`, so the same pair always yields the same record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aspect {
    pub a: ChartPoint,
    pub b: ChartPoint,
    pub kind: AspectKind,
    /// Shorter arc between the points, [0, 180].
    pub separation: f64,
    /// `separation − kind.angle()`.
    pub orb: f64,
    /// Whether the orb is shrinking; `None` when a speed is unknown.
    pub applying: Option<bool>,
}

/// Aspect matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    /// Orb for kinds without an override, degrees.
    pub orb_deg: f64,
    pub kinds: Vec<AspectKind>,
    /// Let the Ascendant, MC, IC and Descendant take part.
    pub include_angles: bool,
    /// Per-kind orb overrides, degrees.
    pub orbs: BTreeMap<AspectKind, f64>,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            orb_deg: 8.0,
            kinds: ALL_ASPECTS.to_vec(),
            include_angles: true,
            orbs: BTreeMap::new(),
        }
    }
}

fn valid_orb(orb: f64) -> bool {
    orb.is_finite() && (0.0..=MAX_ORB_DEG).contains(&orb)
}

impl AspectConfig {
    pub fn validate(&self) -> Result<(), ChartError> {
        if !valid_orb(self.orb_deg) {
            return Err(ChartError::InvalidConfig("orb_deg must be in [0, 30]"));
        }
        if self.kinds.is_empty() {
            return Err(ChartError::InvalidConfig("aspect kinds must not be empty"));
        }
        if !self.orbs.values().copied().all(valid_orb) {
            return Err(ChartError::InvalidConfig("aspect orbs must be in [0, 30]"));
        }
        Ok(())
    }

    pub fn orb_for(&self, kind: AspectKind) -> f64 {
        self.orbs.get(&kind).copied().unwrap_or(self.orb_deg)
    }
}

/// Finds at most one aspect per pair of points.
#[derive(Debug, Clone)]
pub struct AspectMatcher {
    config: AspectConfig,
    /// Configured kinds, deduplicated and sorted by angle.
    kinds: Vec<AspectKind>,
}

impl Default for AspectMatcher {
    fn default() -> Self {
        Self {
            config: AspectConfig::default(),
            kinds: ALL_ASPECTS.to_vec(),
        }
    }
}

impl AspectMatcher {
    pub fn new(config: AspectConfig) -> Result<Self, ChartError> {
        config.validate()?;
        let mut kinds = config.kinds.clone();
        kinds.sort();
        kinds.dedup();
        Ok(Self { config, kinds })
    }

    pub fn config(&self) -> &AspectConfig {
        &self.config
    }

    /// Aspects among `points`, in input pair order.
    pub fn find(&self, points: &[PointPosition]) -> Vec<Aspect> {
        let mut found = Vec::new();
        for (i, p) in points.iter().enumerate() {
            for q in &points[i + 1..] {
                if let Some(aspect) = self.pair(p, q) {
                    found.push(aspect);
                }
            }
        }
        debug!(points = points.len(), aspects = found.len(), "aspects matched");
        found
    }

    /// Aspect between two points, if any.
    pub fn pair(&self, p: &PointPosition, q: &PointPosition) -> Option<Aspect> {
        if p.point == q.point {
            return None;
        }
        if !self.config.include_angles && (p.point.is_angle() || q.point.is_angle()) {
            return None;
        }
        let (p, q) = if p.point <= q.point { (p, q) } else { (q, p) };

        // Signed arc from a to b; its magnitude is the separation.
        let arc = signed_diff_deg(q.longitude, p.longitude);
        let separation = arc.abs();

        // Kinds are sorted by angle, so strict comparison keeps the smaller
        // angle on ties.
        let mut best: Option<(AspectKind, f64)> = None;
        for &kind in &self.kinds {
            let distance = (separation - kind.angle()).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((kind, distance));
            }
        }
        let (kind, distance) = best?;
        if distance > self.config.orb_for(kind) {
            return None;
        }
        let orb = separation - kind.angle();

        let applying = match (p.speed, q.speed) {
            (Some(vp), Some(vq)) => {
                let separation_rate = arc.signum() * (vq - vp);
                Some(orb.signum() * separation_rate < 0.0 && orb != 0.0)
            }
            _ => None,
        };

        Some(Aspect {
            a: p.point,
            b: q.point,
            kind,
            separation,
            orb,
            applying,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CelestialBody::{Mars, Moon, Sun, Venus};

    fn body(b: CelestialBody, longitude: f64, speed: f64) -> PointPosition {
        PointPosition {
            point: ChartPoint::Body(b),
            longitude,
            speed: Some(speed),
        }
    }

    fn angle(a: ChartAngle, longitude: f64) -> PointPosition {
        PointPosition {
            point: ChartPoint::Angle(a),
            longitude,
            speed: None,
        }
    }

    #[test]
    fn nearest_reference_angle() {
        let m = AspectMatcher::default();
        let a = m.pair(&body(Sun, 10.0, 1.0), &body(Mars, 103.0, 0.5)).unwrap();
        assert_eq!(a.kind, AspectKind::Square);
        assert!((a.separation - 93.0).abs() < 1e-9);
        assert!((a.orb - 3.0).abs() < 1e-9);
    }

    #[test]
    fn shorter_arc_across_zero() {
        let m = AspectMatcher::default();
        let a = m.pair(&body(Sun, 355.0, 1.0), &body(Moon, 3.0, 13.0)).unwrap();
        assert_eq!(a.kind, AspectKind::Conjunction);
        assert!((a.separation - 8.0).abs() < 1e-9);
        let opp = m.pair(&body(Sun, 350.0, 1.0), &body(Moon, 175.0, 13.0)).unwrap();
        assert_eq!(opp.kind, AspectKind::Opposition);
        assert!((opp.separation - 175.0).abs() < 1e-9);
    }

    #[test]
    fn pair_is_symmetric() {
        let m = AspectMatcher::default();
        let x = body(Venus, 200.0, 1.2);
        let y = body(Sun, 81.0, 1.0);
        let ab = m.pair(&x, &y).unwrap();
        let ba = m.pair(&y, &x).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.a, ChartPoint::Body(Sun));
        assert_eq!(ab.kind, AspectKind::Trine);
    }

    #[test]
    fn orb_boundary_is_inclusive() {
        let m = AspectMatcher::default();
        let exact = m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 98.0, 0.5));
        assert_eq!(exact.map(|a| a.kind), Some(AspectKind::Square));
        let beyond = m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 98.000_001, 0.5));
        assert!(beyond.is_none());
    }

    #[test]
    fn beyond_orb_with_narrow_config() {
        let m = AspectMatcher::new(AspectConfig {
            orb_deg: 2.0,
            ..AspectConfig::default()
        })
        .unwrap();
        assert!(m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 45.0, 0.5)).is_none());
        assert!(m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 62.0, 0.5)).is_some());
        assert!(m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 62.5, 0.5)).is_none());
    }

    #[test]
    fn ties_prefer_smaller_angle() {
        let m = AspectMatcher::new(AspectConfig {
            orb_deg: 15.0,
            ..AspectConfig::default()
        })
        .unwrap();
        let a = m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 45.0, 0.5)).unwrap();
        assert_eq!(a.kind, AspectKind::SemiSextile);
        assert!((a.orb - 15.0).abs() < 1e-9);
    }

    #[test]
    fn per_kind_orb_override() {
        let mut orbs = BTreeMap::new();
        orbs.insert(AspectKind::Opposition, 10.0);
        let m = AspectMatcher::new(AspectConfig {
            orbs,
            ..AspectConfig::default()
        })
        .unwrap();
        let a = m.pair(&body(Sun, 0.0, 1.0), &body(Moon, 171.0, 13.0)).unwrap();
        assert_eq!(a.kind, AspectKind::Opposition);
        assert!((a.orb + 9.0).abs() < 1e-9);
    }

    #[test]
    fn applying_and_separating() {
        let m = AspectMatcher::default();
        // Separation of 85° shrinking, so the square is moving out of orb.
        let sep = m.pair(&body(Sun, 10.0, 1.0), &body(Mars, 95.0, 0.5)).unwrap();
        assert_eq!(sep.applying, Some(false));
        let app = m.pair(&body(Sun, 10.0, 0.2), &body(Mars, 95.0, 0.5)).unwrap();
        assert_eq!(app.applying, Some(true));
        let ang = m
            .pair(&body(Sun, 10.0, 1.0), &angle(ChartAngle::Ascendant, 12.0))
            .unwrap();
        assert_eq!(ang.applying, None);
    }

    #[test]
    fn angles_can_be_excluded() {
        let points = [
            body(Sun, 10.0, 1.0),
            angle(ChartAngle::Ascendant, 12.0),
            angle(ChartAngle::Descendant, 192.0),
        ];
        assert_eq!(AspectMatcher::default().find(&points).len(), 3);
        let m = AspectMatcher::new(AspectConfig {
            include_angles: false,
            ..AspectConfig::default()
        })
        .unwrap();
        assert!(m.find(&points).is_empty());
    }

    #[test]
    fn restricted_kind_set() {
        let m = AspectMatcher::new(AspectConfig {
            kinds: vec![AspectKind::Trine, AspectKind::Conjunction],
            ..AspectConfig::default()
        })
        .unwrap();
        // 90° is nearest to neither configured kind within orb.
        assert!(m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 90.0, 0.5)).is_none());
        assert!(m.pair(&body(Sun, 0.0, 1.0), &body(Mars, 118.0, 0.5)).is_some());
    }

    #[test]
    fn one_aspect_per_pair() {
        let points = [
            body(Sun, 0.0, 1.0),
            body(Moon, 60.0, 13.0),
            body(Mars, 120.0, 0.5),
        ];
        let found = AspectMatcher::default().find(&points);
        assert_eq!(found.len(), 3);
        let kinds: Vec<_> = found.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            [AspectKind::Sextile, AspectKind::Trine, AspectKind::Sextile]
        );
    }

    #[test]
    fn config_validation() {
        assert!(AspectConfig::default().validate().is_ok());
        let bad = AspectConfig {
            orb_deg: -1.0,
            ..AspectConfig::default()
        };
        assert!(AspectMatcher::new(bad).is_err());
        let empty = AspectConfig {
            kinds: Vec::new(),
            ..AspectConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn kind_names_parse() {
        for kind in ALL_ASPECTS {
            assert_eq!(kind.name().parse::<AspectKind>().unwrap(), kind);
        }
        assert_eq!("Semi_Sextile".parse::<AspectKind>().unwrap(), AspectKind::SemiSextile);
        assert!("sesquiquadrate".parse::<AspectKind>().is_err());
    }
}
