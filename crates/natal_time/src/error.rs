//! Error types for civil-to-astronomical time resolution.

use thiserror::Error;

/// Errors from calendar validation, timezone lookup, or localization.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TimeError {
    /// A date, time, or coordinate field is malformed or out of range.
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: String },
    /// No UTC offset can be determined for the coordinates.
    #[error("could not determine timezone for latitude {latitude}, longitude {longitude}")]
    TimezoneResolutionFailure { latitude: f64, longitude: f64 },
}

impl TimeError {
    pub(crate) fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}
