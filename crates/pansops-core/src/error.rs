//! Error types for protection-area construction.

use thiserror::Error;

/// Errors that can occur while building a protection area.
///
/// Every variant describes invalid input. None of them are transient, so
/// callers should report the message and abort the calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AreaError {
    /// Unit string is not one of ft, m or NM.
    #[error("unrecognized unit: {0:?}")]
    InvalidUnit(String),

    /// Distance, speed, angle or altitude outside its allowed range.
    #[error("invalid {name}: {value}")]
    InvalidMagnitude { name: &'static str, value: f64 },

    /// Selected reference leg has coincident endpoints.
    #[error("selected segment has zero length")]
    DegenerateSegment,

    /// Construction produced (or was asked for) an invalid ring.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// No usable segment or point was selected.
    #[error("missing selection: {0}")]
    MissingSelection(String),
}

impl AreaError {
    pub(crate) fn magnitude(name: &'static str, value: f64) -> Self {
        Self::InvalidMagnitude { name, value }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, AreaError>;

/// Require a finite, strictly positive value.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AreaError::magnitude(name, value))
    }
}

/// Require a finite value that is zero or above.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AreaError::magnitude(name, value))
    }
}
