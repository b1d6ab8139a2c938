use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// One or more required loan fields are unset; callers should treat this
    /// as "not ready to compute" rather than a failure.
    #[error("Incomplete input: missing {}", .missing.join(", "))]
    IncompleteInput { missing: Vec<&'static str> },

    #[error("Invalid parameter: {field} - {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScheduleError {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ScheduleError::IncompleteInput { .. })
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Serialization(e.to_string())
    }
}
