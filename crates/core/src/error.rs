use serde::Serialize;

use crate::types::Bpm;

/// Reasons a raw pulse entry is rejected before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("pulse rate {value} is outside {min}-{max} BPM")]
    OutOfRange { value: i64, min: Bpm, max: Bpm },
}

/// Failure modes of a single-shot location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    /// The user (or platform) refused location access. No fix was attempted.
    #[error("location permission denied")]
    PermissionDenied,

    /// The fix timed out or the device reported an error.
    #[error("location unavailable")]
    Unavailable,
}
