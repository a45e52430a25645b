//! Configuration for the natal chart engine.
//!
//! One TOML document with a section per component:
//!
//! ```toml
//! [ephemeris]
//! start_jd = 2415020.5
//! interpolation_order = 8
//!
//! [time]
//! ocean_policy = "reject"
//!
//! [houses]
//! polar_fallback = "none"
//!
//! [aspects]
//! orb_deg = 8.0
//! orbs = { opposition = 10.0 }
//!
//! [chart]
//! bodies = ["Sun", "Moon"]
//! ```
//!
//! Every field has a default, so an empty document is a valid config.

pub mod error;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use natal_chart::{AspectConfig, AspectMatcher, ChartBuilder, ChartConfig, HouseConfig, HouseSolver};
use natal_ephem::{Ephemeris, EphemerisConfig};
use natal_time::{TimeConfig, TimeResolver};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use error::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "NATAL_CONFIG";

/// File looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "natal.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NatalConfig {
    pub ephemeris: EphemerisConfig,
    pub time: TimeConfig,
    pub houses: HouseConfig,
    pub aspects: AspectConfig,
    pub chart: ChartConfig,
}

impl NatalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load from [`config_path`], or fall back to defaults when no file is
    /// configured.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path(explicit) {
            Some(path) => Self::load(&path),
            None => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ephemeris.validate()?;
        self.houses.validate()?;
        self.aspects.validate()?;
        self.chart.validate()?;
        // A tabulated ephemeris only serves the bodies it was asked for.
        if self.ephemeris.table_path.is_none() {
            if let Some(missing) = self
                .chart
                .bodies
                .iter()
                .find(|b| !self.ephemeris.bodies.contains(b))
            {
                return Err(ConfigError::Inconsistent(format!(
                    "chart body {missing} is not in ephemeris.bodies"
                )));
            }
        }
        Ok(())
    }

    /// Build the shared components and wire them into a [`ChartBuilder`].
    pub fn chart_builder(&self) -> Result<ChartBuilder, ConfigError> {
        let ephemeris = Ephemeris::new(&self.ephemeris)?;
        Ok(ChartBuilder::new(
            Arc::new(ephemeris),
            TimeResolver::new(self.time),
            HouseSolver::new(self.houses)?,
            AspectMatcher::new(self.aspects.clone())?,
            self.chart.clone(),
        )?)
    }
}

/// Config file to use: the explicit path, else `$NATAL_CONFIG`, else
/// `natal.toml` when it exists in the working directory.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_path(
        explicit,
        std::env::var_os(CONFIG_ENV_VAR),
        Path::new(DEFAULT_CONFIG_FILE),
    )
}

fn resolve_path(explicit: Option<&Path>, env: Option<OsString>, fallback: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    fallback.exists().then(|| fallback.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use natal_chart::{AspectKind, PolarFallback};
    use natal_ephem::CelestialBody;
    use natal_time::OceanPolicy;

    #[test]
    fn empty_document_is_default() {
        let config = NatalConfig::from_toml_str("").unwrap();
        assert_eq!(config, NatalConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = NatalConfig::from_toml_str(
            r#"
            [time]
            ocean_policy = "nautical"

            [houses]
            polar_fallback = "porphyry"
            max_iterations = 20

            [aspects]
            orb_deg = 6.0
            kinds = ["conjunction", "square", "opposition"]
            include_angles = false

            [aspects.orbs]
            opposition = 10.0

            [chart]
            bodies = ["Sun", "Moon", "Lilith"]
            "#,
        )
        .unwrap();
        assert_eq!(config.time.ocean_policy, OceanPolicy::Nautical);
        assert_eq!(config.houses.polar_fallback, PolarFallback::Porphyry);
        assert_eq!(config.houses.max_iterations, 20);
        assert_eq!(config.houses.tolerance_deg, 1e-7);
        assert_eq!(config.aspects.orb_for(AspectKind::Opposition), 10.0);
        assert_eq!(config.aspects.orb_for(AspectKind::Square), 6.0);
        assert!(!config.aspects.include_angles);
        assert_eq!(
            config.chart.bodies,
            [CelestialBody::Sun, CelestialBody::Moon, CelestialBody::MeanApogee]
        );
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = NatalConfig::from_toml_str("[housez]\nmax_iterations = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            NatalConfig::from_toml_str("[aspects]\norb_deg = 45.0\n"),
            Err(ConfigError::Chart(_))
        ));
        assert!(matches!(
            NatalConfig::from_toml_str("[houses]\ntolerance_deg = 0.0\n"),
            Err(ConfigError::Houses(_))
        ));
        assert!(matches!(
            NatalConfig::from_toml_str("[ephemeris]\ninterpolation_order = 40\n"),
            Err(ConfigError::Ephemeris(_))
        ));
    }

    #[test]
    fn chart_bodies_must_be_tabulated() {
        let err = NatalConfig::from_toml_str("[chart]\nbodies = [\"Sun\", \"Chiron\"]\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Inconsistent(_)), "{err:?}");
    }

    #[test]
    fn toml_round_trip() {
        let config = NatalConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(NatalConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn path_resolution_order() {
        let missing = Path::new("/nonexistent/natal.toml");
        assert_eq!(
            resolve_path(Some(Path::new("a.toml")), Some("b.toml".into()), missing),
            Some(PathBuf::from("a.toml"))
        );
        assert_eq!(
            resolve_path(None, Some("b.toml".into()), missing),
            Some(PathBuf::from("b.toml"))
        );
        assert_eq!(resolve_path(None, Some(OsString::new()), missing), None);
        assert_eq!(resolve_path(None, None, missing), None);
    }
}
