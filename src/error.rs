//! Error types for the stockcast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fetching data or fitting and predicting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The upstream data source failed (network error, bad response).
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    /// The request was valid but the source has no rows for the range.
    #[error("no data returned for the requested range")]
    EmptyResult,

    /// Too few usable observations after cleaning.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Forecast horizon must be non-negative.
    #[error("invalid horizon: {0} days")]
    InvalidHorizon(i64),

    /// Bad request parameters (ticker, year, horizon range).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Series timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing")]
    NonMonotonicTimestamps,

    /// Numerical failure (e.g. singular design matrix).
    #[error("computation error: {0}")]
    ComputationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::SourceUnavailable("timeout".to_string());
        assert_eq!(err.to_string(), "data source unavailable: timeout");

        let err = ForecastError::EmptyResult;
        assert_eq!(err.to_string(), "no data returned for the requested range");

        let err = ForecastError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(err.to_string(), "insufficient data: need at least 2, got 1");

        let err = ForecastError::InvalidHorizon(-5);
        assert_eq!(err.to_string(), "invalid horizon: -5 days");

        let err = ForecastError::InvalidConfiguration("empty ticker".to_string());
        assert_eq!(err.to_string(), "invalid configuration: empty ticker");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::EmptyResult;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
