//! Validated request parameters.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Lower bound on the history start year.
const MIN_START_YEAR: i32 = 1900;
/// Bounds on the prediction horizon in years.
const HORIZON_YEARS_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// A validated forecast request: which series, how much history, how far
/// ahead. Construction rejects bad input before any fetch happens.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    ticker: String,
    start_year: i32,
    horizon_years: u32,
}

impl RequestConfig {
    /// Validate and build a request. `today` anchors the year check so the
    /// whole pipeline stays a pure function of its inputs.
    pub fn new(
        ticker: &str,
        start_year: i32,
        horizon_years: u32,
        today: NaiveDate,
    ) -> Result<Self> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(ForecastError::InvalidConfiguration(
                "ticker must not be empty".to_string(),
            ));
        }
        let max_year = today.year() - 1;
        if start_year < MIN_START_YEAR || start_year > max_year {
            return Err(ForecastError::InvalidConfiguration(format!(
                "start year {} outside {}..={}",
                start_year, MIN_START_YEAR, max_year
            )));
        }
        if !HORIZON_YEARS_RANGE.contains(&horizon_years) {
            return Err(ForecastError::InvalidConfiguration(format!(
                "horizon of {} years outside {}..={}",
                horizon_years,
                HORIZON_YEARS_RANGE.start(),
                HORIZON_YEARS_RANGE.end()
            )));
        }
        Ok(Self {
            ticker: ticker.to_string(),
            start_year,
            horizon_years,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    /// First day of history: January 1st of the start year.
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start_year, 1, 1).expect("January 1st always exists")
    }

    /// Horizon in days (365 per requested year).
    pub fn horizon_days(&self) -> i64 {
        self.horizon_years as i64 * 365
    }
}
