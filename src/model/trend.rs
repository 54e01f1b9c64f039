//! Piecewise-linear trend with automatically placed changepoints.

use chrono::NaiveDate;

/// Maps calendar dates onto the scaled time axis used by the trend:
/// 0.0 at the first training date, 1.0 at the last. Dates beyond the
/// training range map past 1.0, which is how extrapolation stays linear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: NaiveDate,
    span_days: f64,
}

impl TimeScale {
    /// Build a scale over a training range. A degenerate range (end not
    /// after start) is clamped to a one-day span.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let span_days = ((end - start).num_days() as f64).max(1.0);
        Self { start, span_days }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn span_days(&self) -> f64 {
        self.span_days
    }

    /// Scaled position of a date. Negative before the training range,
    /// greater than 1.0 after it.
    pub fn position(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }
}

/// A date at which the trend's growth rate shifts, and by how much
/// (in scaled-time units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Changepoint {
    pub date: NaiveDate,
    pub rate_delta: f64,
}

/// Fitted piecewise-linear growth curve.
///
/// `g(t) = m + k*t + sum_j delta_j * max(0, t - s_j)` over scaled time.
/// The hinge basis keeps the curve continuous at every changepoint and
/// extends it linearly (at the last active rate) beyond the training
/// range.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendModel {
    /// Base offset.
    m: f64,
    /// Base growth rate (per scaled-time unit).
    k: f64,
    changepoints: Vec<Changepoint>,
    /// Scaled positions of the changepoints, parallel to `changepoints`.
    locations: Vec<f64>,
    scale: TimeScale,
}

impl TrendModel {
    /// Assemble a fitted trend from solved coefficients.
    pub fn new(m: f64, k: f64, changepoint_dates: Vec<NaiveDate>, rate_deltas: Vec<f64>, scale: TimeScale) -> Self {
        debug_assert_eq!(changepoint_dates.len(), rate_deltas.len());
        let locations = changepoint_dates.iter().map(|&d| scale.position(d)).collect();
        let changepoints = changepoint_dates
            .into_iter()
            .zip(rate_deltas)
            .map(|(date, rate_delta)| Changepoint { date, rate_delta })
            .collect();
        Self {
            m,
            k,
            changepoints,
            locations,
            scale,
        }
    }

    /// Candidate changepoint dates: evenly spaced index quantiles over the
    /// first `changepoint_range` fraction of the observed dates, excluding
    /// the first observation. Short histories yield fewer candidates; two
    /// points yield none.
    pub fn place_changepoints(
        dates: &[NaiveDate],
        n_changepoints: usize,
        changepoint_range: f64,
    ) -> Vec<NaiveDate> {
        let hist_size = (dates.len() as f64 * changepoint_range).floor() as usize;
        if hist_size < 2 {
            return Vec::new();
        }
        let n = n_changepoints.min(hist_size - 1);
        if n == 0 {
            return Vec::new();
        }

        let mut selected = Vec::with_capacity(n);
        for i in 1..=n {
            let idx = ((i as f64 / n as f64) * (hist_size - 1) as f64).round() as usize;
            let date = dates[idx];
            if selected.last() != Some(&date) {
                selected.push(date);
            }
        }
        selected
    }

    /// Trend basis row for a scaled time: `[1, t, hinge_1 .. hinge_J]`.
    pub fn basis_row(t: f64, locations: &[f64]) -> Vec<f64> {
        let mut row = Vec::with_capacity(2 + locations.len());
        row.push(1.0);
        row.push(t);
        for &s in locations {
            row.push((t - s).max(0.0));
        }
        row
    }

    /// Trend value at a date; linear continuation beyond the training range.
    pub fn evaluate(&self, date: NaiveDate) -> f64 {
        self.value_at(self.scale.position(date))
    }

    /// Trend value at a scaled time.
    pub fn value_at(&self, t: f64) -> f64 {
        let mut g = self.m + self.k * t;
        for (cp, &s) in self.changepoints.iter().zip(&self.locations) {
            if t > s {
                g += cp.rate_delta * (t - s);
            }
        }
        g
    }

    /// Growth rate per calendar day active at the end of the training range.
    pub fn terminal_daily_rate(&self) -> f64 {
        let total: f64 = self.k + self.changepoints.iter().map(|cp| cp.rate_delta).sum::<f64>();
        total / self.scale.span_days()
    }

    pub fn offset(&self) -> f64 {
        self.m
    }

    pub fn base_rate(&self) -> f64 {
        self.k
    }

    pub fn changepoints(&self) -> &[Changepoint] {
        &self.changepoints
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    /// Mean absolute fitted rate delta; the dispersion used when
    /// simulating future rate changes.
    pub fn mean_abs_delta(&self) -> f64 {
        if self.changepoints.is_empty() {
            return 0.0;
        }
        self.changepoints.iter().map(|cp| cp.rate_delta.abs()).sum::<f64>()
            / self.changepoints.len() as f64
    }
}
