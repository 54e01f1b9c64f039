//! Daily time series with strictly increasing dates.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// A single observation: a calendar date and a value.
///
/// The value may be non-finite (missing quote); such points are dropped
/// by [`Series::clean`] before any model fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered daily series. Dates are strictly increasing; gaps
/// (non-trading days) are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<TimePoint>,
}

impl Series {
    /// Create a series from points, validating strict date monotonicity.
    pub fn new(points: Vec<TimePoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ForecastError::NonMonotonicTimestamps);
            }
        }
        Ok(Self { points })
    }

    /// Create a series from parallel date and value vectors.
    pub fn from_parts(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ComputationError(format!(
                "date/value length mismatch: {} vs {}",
                dates.len(),
                values.len()
            )));
        }
        Self::new(
            dates
                .into_iter()
                .zip(values)
                .map(|(date, value)| TimePoint { date, value })
                .collect(),
        )
    }

    /// Build a series from unordered raw rows: stable-sorts by date and
    /// deduplicates, keeping the first occurrence of each date.
    pub fn from_rows(mut points: Vec<TimePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// An empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Last `n` points (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[TimePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Days between the first and last observation.
    pub fn span_days(&self) -> i64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }

    /// Drop points with non-finite values. Order is preserved, so the
    /// result is still strictly increasing.
    pub fn clean(&self) -> Series {
        Series {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| p.value.is_finite())
                .collect(),
        }
    }

    /// Median gap between consecutive observations, in days.
    /// Returns `None` for series with fewer than 2 points.
    pub fn median_gap_days(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let mut gaps: Vec<i64> = self
            .points
            .windows(2)
            .map(|pair| (pair[1].date - pair[0].date).num_days())
            .collect();
        gaps.sort_unstable();
        let n = gaps.len();
        let median = if n % 2 == 0 {
            (gaps[n / 2 - 1] + gaps[n / 2]) as f64 / 2.0
        } else {
            gaps[n / 2] as f64
        };
        Some(median)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_non_monotonic_dates() {
        let points = vec![
            TimePoint::new(date(2024, 1, 2), 1.0),
            TimePoint::new(date(2024, 1, 1), 2.0),
        ];
        assert_eq!(
            Series::new(points).unwrap_err(),
            ForecastError::NonMonotonicTimestamps
        );
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let points = vec![
            TimePoint::new(date(2024, 1, 1), 1.0),
            TimePoint::new(date(2024, 1, 1), 2.0),
        ];
        assert!(Series::new(points).is_err());
    }

    #[test]
    fn new_allows_gaps() {
        let points = vec![
            TimePoint::new(date(2024, 1, 5), 1.0),
            TimePoint::new(date(2024, 1, 8), 2.0),
        ];
        let series = Series::new(points).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.span_days(), 3);
    }

    #[test]
    fn from_rows_sorts_and_keeps_first_duplicate() {
        let series = Series::from_rows(vec![
            TimePoint::new(date(2024, 1, 3), 3.0),
            TimePoint::new(date(2024, 1, 1), 1.0),
            TimePoint::new(date(2024, 1, 1), 99.0),
            TimePoint::new(date(2024, 1, 2), 2.0),
        ]);
        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn clean_drops_non_finite_values() {
        let series = Series::from_parts(
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)],
            vec![1.0, f64::NAN, 3.0],
        )
        .unwrap();
        let cleaned = series.clean();
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.values().all(|v| v.is_finite()));
    }

    #[test]
    fn tail_returns_last_points() {
        let series = Series::from_parts(
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap();
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].value, 2.0);
        // Asking for more than available returns everything
        assert_eq!(series.tail(10).len(), 3);
    }

    #[test]
    fn median_gap_reflects_trading_calendar() {
        // Mon..Fri, then the next Mon: gaps 1,1,1,1,3
        let series = Series::from_parts(
            vec![
                date(2024, 1, 1),
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 4),
                date(2024, 1, 5),
                date(2024, 1, 8),
            ],
            vec![1.0; 6],
        )
        .unwrap();
        assert_eq!(series.median_gap_days(), Some(1.0));
        assert_eq!(Series::empty().median_gap_days(), None);
    }
}
