//! Error types for ephemeris construction and queries.

use std::path::PathBuf;

use thiserror::Error;

use crate::body::CelestialBody;

/// Errors from loading, building or querying an ephemeris.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid query: {0}")]
    InvalidQuery(&'static str),
    /// The requested time lies outside the body's sampled range.
    #[error("{body} not covered at JD {jd}: data spans JD {start} to {end}")]
    OutOfRange {
        body: CelestialBody,
        jd: f64,
        start: f64,
        end: f64,
    },
    /// The data source has no samples for the body.
    #[error("body not supported by ephemeris source: {0}")]
    UnsupportedBody(CelestialBody),
    #[error("unknown body name: {0}")]
    UnknownBody(String),
    #[error("table parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("cannot read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl EphemerisError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
