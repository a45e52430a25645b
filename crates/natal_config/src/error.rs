//! Error types for configuration loading.

use std::path::PathBuf;

use natal_chart::{ChartError, HouseError};
use natal_ephem::EphemerisError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("malformed config: {0}")]
    Parse(String),
    /// Sections are individually valid but disagree with each other.
    #[error("inconsistent config: {0}")]
    Inconsistent(String),
    #[error("[ephemeris] {0}")]
    Ephemeris(#[from] EphemerisError),
    #[error("[houses] {0}")]
    Houses(#[from] HouseError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}
