// src/errors.rs

use chrono::{DateTime, Utc};

/// Error type shared by the radar and swipe modules
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Observer or candidate coordinate is missing, non-numeric or out of range.
    /// Callers filter these out before projecting.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The rolling daily swipe allowance is used up
    #[error("Daily swipe limit reached")]
    LimitReached { resets_at: Option<DateTime<Utc>> },

    /// A remote read or write failed. Not retried here.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MatchError {
    /// True for failures the user can recover from by waiting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MatchError::LimitReached { .. })
    }
}

pub type MatchResult<T> = std::result::Result<T, MatchError>;
