//! Upstream market-data interface.
//!
//! The real transport (HTTP client, files, whatever) lives outside this
//! crate; the pipeline only needs something that can produce OHLC rows
//! for a symbol and date range.

use crate::core::{Series, TimePoint};
use crate::error::Result;
use chrono::NaiveDate;

/// One raw daily quote row from a market-data source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhlcRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A source of historical daily quotes.
///
/// `fetch` may return an empty vec (valid request, no data) or fail with
/// [`crate::error::ForecastError::SourceUnavailable`].
pub trait MarketDataSource {
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<OhlcRow>>;
}

/// Extract the close-price series from raw rows. Rows are sorted by date
/// and duplicate dates keep their first occurrence.
pub fn close_series(rows: &[OhlcRow]) -> Series {
    Series::from_rows(
        rows.iter()
            .map(|row| TimePoint::new(row.date, row.close))
            .collect(),
    )
}
