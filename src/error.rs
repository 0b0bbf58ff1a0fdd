use crate::track::TrackId;
use std::fmt;

#[derive(Debug)]
pub enum TrackError {
    /// A track set was built with the same id twice.
    DuplicateId(TrackId),
    NonFiniteVolume(f64),
    /// Seconds value that cannot become a `Duration` (negative, NaN, infinite).
    InvalidDuration(f64),
    ZeroSampleRate,
    Json(serde_json::Error),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::DuplicateId(id) => write!(f, "Duplicate track id '{id}'"),
            TrackError::NonFiniteVolume(v) => write!(f, "Volume must be finite, got {v}"),
            TrackError::InvalidDuration(secs) => {
                write!(f, "Invalid duration: {secs} seconds")
            }
            TrackError::ZeroSampleRate => write!(f, "Sample rate must be greater than zero"),
            TrackError::Json(e) => write!(f, "Arrangement error: {e}"),
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(e: serde_json::Error) -> Self {
        TrackError::Json(e)
    }
}

/// Convert a seconds value from user input into a `Duration`.
pub(crate) fn duration_from_secs(secs: f64) -> Result<std::time::Duration, TrackError> {
    std::time::Duration::try_from_secs_f64(secs).map_err(|_| TrackError::InvalidDuration(secs))
}
