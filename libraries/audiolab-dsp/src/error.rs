//! Effect error types

use audiolab_core::CoreError;
use thiserror::Error;

/// Result type alias using `EffectError`
pub type Result<T> = std::result::Result<T, EffectError>;

/// Errors reported by effect validation and processing
///
/// All variants are deterministic input failures; none are retried.
#[derive(Error, Debug)]
pub enum EffectError {
    /// A parameter is out of bounds or malformed
    #[error("Invalid parameter '{field}' = {value}: {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    /// Trim start/end do not describe a range inside the signal
    #[error("Invalid range [{start}s, {end}s) for a {duration}s signal: {reason}")]
    InvalidRange {
        start: f64,
        end: f64,
        duration: f64,
        reason: &'static str,
    },

    /// Zero-length input where a duration is required
    #[error("Signal is empty")]
    EmptySignal,

    /// Effect identifier not in the catalogue
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    /// Output buffer could not be assembled
    #[error(transparent)]
    Buffer(#[from] CoreError),

    /// Pitch-shift backend failure
    #[error("Pitch shift backend error: {0}")]
    PitchBackend(String),
}

impl EffectError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is a parameter error
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}
