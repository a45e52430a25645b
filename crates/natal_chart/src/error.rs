//! Error types for house solving and chart assembly.

use natal_ephem::EphemerisError;
use natal_time::TimeError;
use serde::Serialize;
use thiserror::Error;

/// Errors from the house solver.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HouseError {
    #[error("invalid house config: {0}")]
    InvalidConfig(&'static str),
    /// A latitude or sidereal time outside the solvable domain.
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
    /// No cusp could be produced for the latitude.
    #[error("house cusps did not converge at latitude {latitude}: {reason}")]
    ConvergenceFailure {
        /// Cusp being solved, if the failure happened inside the iteration.
        cusp: Option<u8>,
        latitude: f64,
        reason: &'static str,
    },
}

/// Coarse classification of chart failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    TimezoneResolutionFailure,
    EphemerisDataUnavailable,
    ConvergenceFailure,
}

/// Errors from building a chart.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: String },
    #[error("invalid chart config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Houses(#[from] HouseError),
}

impl ChartError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
        }
    }

    /// The failure class this error reports to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::InvalidConfig(_) => ErrorKind::InvalidInput,
            Self::Time(TimeError::TimezoneResolutionFailure { .. }) => {
                ErrorKind::TimezoneResolutionFailure
            }
            Self::Time(_) => ErrorKind::InvalidInput,
            Self::Ephemeris(EphemerisError::InvalidQuery(_)) => ErrorKind::InvalidInput,
            Self::Ephemeris(_) => ErrorKind::EphemerisDataUnavailable,
            Self::Houses(HouseError::ConvergenceFailure { .. }) => ErrorKind::ConvergenceFailure,
            Self::Houses(_) => ErrorKind::InvalidInput,
        }
    }
}
