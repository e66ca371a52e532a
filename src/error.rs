//! Error types for the surge-detect library.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;

/// Errors that can occur while normalizing a series or detecting events.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// Input contains no observations.
    #[error("empty input data")]
    EmptyInput,

    /// Series is too short for the requested decomposition period.
    #[error("insufficient data: need at least {needed} days, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The same calendar date appears more than once in the input.
    #[error("duplicate observation for {date}")]
    DuplicateObservation { date: NaiveDate },

    /// Invalid configuration or argument value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical failure during decomposition or scoring.
    #[error("computation error: {0}")]
    Computation(String),
}
