//! Periodic components as truncated Fourier series.
//!
//! Seasonal terms are functions of absolute calendar time (days since the
//! Unix epoch), so evaluation at any date, past or future, is exactly
//! periodic by construction.

use crate::core::Series;
use chrono::NaiveDate;
use std::f64::consts::TAU;

/// Days since 1970-01-01 as a float.
pub(crate) fn days_since_epoch(date: NaiveDate) -> f64 {
    (date - NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date")).num_days() as f64
}

/// Configuration of one seasonal component.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalConfig {
    pub name: String,
    pub period_days: f64,
    pub fourier_order: usize,
    /// Minimum number of full periods the observed span must cover for
    /// this component to be fit.
    pub min_cycles: f64,
}

impl SeasonalConfig {
    pub fn new(name: impl Into<String>, period_days: f64, fourier_order: usize) -> Self {
        Self {
            name: name.into(),
            period_days,
            fourier_order,
            min_cycles: 2.0,
        }
    }

    /// Yearly seasonality: 365.25-day period, order 10.
    pub fn yearly() -> Self {
        Self::new("yearly", 365.25, 10)
    }

    /// Weekly seasonality: 7-day period, order 3.
    pub fn weekly() -> Self {
        Self::new("weekly", 7.0, 3)
    }

    /// Whether the observed history supports fitting this component:
    /// the span must cover `min_cycles` periods and the sampling must
    /// resolve the period (median gap shorter than the period).
    pub fn is_enabled(&self, series: &Series) -> bool {
        if (series.span_days() as f64) < self.min_cycles * self.period_days {
            return false;
        }
        match series.median_gap_days() {
            Some(gap) => gap < self.period_days,
            None => false,
        }
    }

    /// Fourier feature row for a date: `[cos(2π·1·x/p), sin(2π·1·x/p), ..]`
    /// up to `fourier_order` harmonics.
    pub fn feature_row(&self, date: NaiveDate) -> Vec<f64> {
        let x = days_since_epoch(date);
        let mut row = Vec::with_capacity(2 * self.fourier_order);
        for n in 1..=self.fourier_order {
            let angle = TAU * n as f64 * x / self.period_days;
            row.push(angle.cos());
            row.push(angle.sin());
        }
        row
    }
}

/// One harmonic of a fitted seasonal component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourierTerm {
    /// Harmonic number (1-based).
    pub order: usize,
    pub cos_coef: f64,
    pub sin_coef: f64,
}

/// A fitted seasonal component.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalModel {
    name: String,
    period_days: f64,
    terms: Vec<FourierTerm>,
}

impl SeasonalModel {
    /// Assemble a fitted component from solved coefficients, laid out as
    /// interleaved cos/sin pairs per harmonic.
    pub fn from_coefficients(config: &SeasonalConfig, coefficients: &[f64]) -> Self {
        debug_assert_eq!(coefficients.len(), 2 * config.fourier_order);
        let terms = coefficients
            .chunks_exact(2)
            .enumerate()
            .map(|(i, pair)| FourierTerm {
                order: i + 1,
                cos_coef: pair[0],
                sin_coef: pair[1],
            })
            .collect();
        Self {
            name: config.name.clone(),
            period_days: config.period_days,
            terms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period_days(&self) -> f64 {
        self.period_days
    }

    pub fn terms(&self) -> &[FourierTerm] {
        &self.terms
    }

    /// Seasonal contribution at a date. Purely periodic, so future dates
    /// are as exact as historical ones.
    pub fn evaluate(&self, date: NaiveDate) -> f64 {
        self.value_at(days_since_epoch(date))
    }

    fn value_at(&self, x: f64) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                let angle = TAU * term.order as f64 * x / self.period_days;
                term.cos_coef * angle.cos() + term.sin_coef * angle.sin()
            })
            .sum()
    }

    /// Half the peak-to-trough range over one period, probed daily.
    pub fn amplitude(&self) -> f64 {
        let steps = (self.period_days.ceil() as usize).max(8);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for i in 0..=steps {
            let v = self.value_at(i as f64 * self.period_days / steps as f64);
            min = min.min(v);
            max = max.max(v);
        }
        (max - min) / 2.0
    }
}
