//! Forecast engine: joint MAP fit of trend and seasonality, prediction
//! over an extended calendar index, and simulated uncertainty bands.

use crate::core::{ForecastRow, ForecastTable, Series};
use crate::error::{ForecastError, Result};
use crate::model::seasonal::{SeasonalConfig, SeasonalModel};
use crate::model::trend::{TimeScale, TrendModel};
use crate::utils::ridge::ridge_solve;
use crate::utils::stats::{quantile, quantile_normal, std_dev};
use chrono::{Duration, NaiveDate};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Laplace;
use std::collections::BTreeMap;
use tracing::debug;

/// Tuning knobs for fitting and prediction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of candidate changepoints.
    pub n_changepoints: usize,
    /// Fraction of the history allowed to host changepoints.
    pub changepoint_range: f64,
    /// Prior scale on changepoint rate deltas; smaller shrinks harder.
    pub changepoint_prior_scale: f64,
    /// Prior scale on seasonal coefficients.
    pub seasonality_prior_scale: f64,
    /// Seasonal components to consider (each self-disables on short spans).
    pub seasonalities: Vec<SeasonalConfig>,
    /// Width of the uncertainty interval (0.8 = 10th..90th percentile).
    pub interval_width: f64,
    /// Number of simulated future trend paths.
    pub uncertainty_samples: usize,
    /// Random seed for the simulation (None for entropy).
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            seasonalities: vec![SeasonalConfig::yearly(), SeasonalConfig::weekly()],
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the random seed for reproducible intervals.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the seasonal component set.
    pub fn with_seasonalities(mut self, seasonalities: Vec<SeasonalConfig>) -> Self {
        self.seasonalities = seasonalities;
        self
    }

    /// Set changepoint count and placement range.
    pub fn with_changepoints(mut self, n: usize, range: f64) -> Self {
        self.n_changepoints = n;
        self.changepoint_range = range.clamp(0.0, 1.0);
        self
    }

    /// Set the uncertainty interval width.
    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width.clamp(0.01, 0.99);
        self
    }
}

/// An immutable fitted model. Refitting produces a new value; nothing is
/// updated in place.
#[derive(Debug, Clone)]
pub struct FittedModel {
    trend: TrendModel,
    seasonals: Vec<SeasonalModel>,
    /// Standard deviation of the in-sample residuals.
    sigma_obs: f64,
    /// Cleaned training series the model was fit on.
    training: Series,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl FittedModel {
    pub fn trend(&self) -> &TrendModel {
        &self.trend
    }

    pub fn seasonals(&self) -> &[SeasonalModel] {
        &self.seasonals
    }

    pub fn seasonal(&self, name: &str) -> Option<&SeasonalModel> {
        self.seasonals.iter().find(|s| s.name() == name)
    }

    pub fn sigma_obs(&self) -> f64 {
        self.sigma_obs
    }

    pub fn training(&self) -> &Series {
        &self.training
    }

    /// In-sample predictions, parallel to the training series.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Training residuals (actual - fitted).
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}

/// Fits the additive model and projects it forward.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fit trend and all enabled seasonal components in one penalized
    /// least-squares solve.
    ///
    /// Cleaning drops non-finite values; at least 2 usable observations
    /// are required.
    pub fn fit(&self, series: &Series) -> Result<FittedModel> {
        let cleaned = series.clean();
        let n = cleaned.len();
        if n < 2 {
            return Err(ForecastError::InsufficientData { needed: 2, got: n });
        }

        let dates: Vec<NaiveDate> = cleaned.dates().collect();
        let y: Vec<f64> = cleaned.values().collect();
        let scale = TimeScale::new(dates[0], dates[n - 1]);

        let changepoint_dates = TrendModel::place_changepoints(
            &dates,
            self.config.n_changepoints,
            self.config.changepoint_range,
        );
        let locations: Vec<f64> = changepoint_dates
            .iter()
            .map(|&d| scale.position(d))
            .collect();

        let enabled: Vec<&SeasonalConfig> = self
            .config
            .seasonalities
            .iter()
            .filter(|c| c.is_enabled(&cleaned))
            .collect();
        debug!(
            observations = n,
            changepoints = locations.len(),
            seasonal_components = enabled.len(),
            "fitting additive model"
        );

        // One penalty per column: offset and base rate free, changepoint
        // deltas under the sparsity prior, seasonal harmonics under a
        // weak prior.
        let delta_penalty = self.config.changepoint_prior_scale.powi(-2);
        let seasonal_penalty = self.config.seasonality_prior_scale.powi(-2);
        let mut penalties = vec![0.0, 0.0];
        penalties.extend(std::iter::repeat(delta_penalty).take(locations.len()));
        for config in &enabled {
            penalties.extend(std::iter::repeat(seasonal_penalty).take(2 * config.fourier_order));
        }

        let design: Vec<Vec<f64>> = dates
            .iter()
            .map(|&d| {
                let mut row = TrendModel::basis_row(scale.position(d), &locations);
                for config in &enabled {
                    row.extend(config.feature_row(d));
                }
                row
            })
            .collect();

        let beta = ridge_solve(&design, &y, &penalties)?;

        let fitted: Vec<f64> = design
            .iter()
            .map(|row| row.iter().zip(&beta).map(|(x, b)| x * b).sum())
            .collect();
        let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(yi, fi)| yi - fi).collect();
        let sigma = std_dev(&residuals);
        let sigma_obs = if sigma.is_finite() { sigma } else { 0.0 };

        let n_deltas = locations.len();
        let trend = TrendModel::new(
            beta[0],
            beta[1],
            changepoint_dates,
            beta[2..2 + n_deltas].to_vec(),
            scale,
        );

        let mut offset = 2 + n_deltas;
        let mut seasonals = Vec::with_capacity(enabled.len());
        for &config in &enabled {
            let width = 2 * config.fourier_order;
            seasonals.push(SeasonalModel::from_coefficients(
                config,
                &beta[offset..offset + width],
            ));
            offset += width;
        }

        Ok(FittedModel {
            trend,
            seasonals,
            sigma_obs,
            training: cleaned,
            fitted,
            residuals,
        })
    }

    /// Predict over the extended index: all training dates followed by
    /// `horizon_days` consecutive calendar days.
    ///
    /// A zero horizon yields exactly the training dates; a negative one
    /// is rejected.
    pub fn predict(&self, model: &FittedModel, horizon_days: i64) -> Result<ForecastTable> {
        if horizon_days < 0 {
            return Err(ForecastError::InvalidHorizon(horizon_days));
        }
        let last = match model.training.last() {
            Some(point) => point.date,
            None => return Err(ForecastError::InsufficientData { needed: 2, got: 0 }),
        };

        let mut dates: Vec<NaiveDate> = model.training.dates().collect();
        let n_history = dates.len();
        for h in 1..=horizon_days {
            dates.push(last + Duration::days(h));
        }

        let n_future = horizon_days as usize;
        let (lower_dev, upper_dev) = self.simulate_trend_deviations(model, n_future)?;

        let z = quantile_normal(0.5 + self.config.interval_width / 2.0);
        let noise_half = z * model.sigma_obs;

        let mut rows = Vec::with_capacity(dates.len());
        for (i, &date) in dates.iter().enumerate() {
            let trend = model.trend.evaluate(date);
            let mut seasonal = BTreeMap::new();
            for component in &model.seasonals {
                seasonal.insert(component.name().to_string(), component.evaluate(date));
            }
            let yhat = trend + seasonal.values().sum::<f64>();

            // History carries the observation-noise band; future rows widen
            // it with the simulated trend deviation, combined in quadrature.
            let (low_half, up_half) = if i < n_history {
                (noise_half, noise_half)
            } else {
                let h = i - n_history;
                (
                    (lower_dev[h].powi(2) + noise_half.powi(2)).sqrt(),
                    (upper_dev[h].powi(2) + noise_half.powi(2)).sqrt(),
                )
            };

            rows.push(ForecastRow {
                date,
                trend,
                seasonal,
                yhat,
                yhat_lower: yhat - low_half,
                yhat_upper: yhat + up_half,
            });
        }

        Ok(ForecastTable::new(rows))
    }

    /// Interval quantiles of simulated future trend deviations, one pair
    /// per future day, widened monotonically with the horizon.
    ///
    /// Each simulated path draws new changepoints at the historical
    /// changepoint frequency, with rate deltas from a Laplace distribution
    /// scaled by the mean absolute fitted delta. Seasonality is treated as
    /// certain, so only the trend is simulated.
    fn simulate_trend_deviations(
        &self,
        model: &FittedModel,
        n_future: usize,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        if n_future == 0 {
            return Ok((Vec::new(), Vec::new()));
        }

        let lambda = model.trend.mean_abs_delta();
        let span_days = model.trend.scale().span_days();
        let change_prob = model.trend.changepoints().len() as f64 / span_days;
        let samples = self.config.uncertainty_samples;

        if samples == 0 || lambda <= f64::EPSILON || change_prob <= 0.0 {
            // Degenerate trend (e.g. two-point fit): no rate uncertainty.
            return Ok((vec![0.0; n_future], vec![0.0; n_future]));
        }

        let laplace = Laplace::new(0.0, lambda)
            .map_err(|e| ForecastError::ComputationError(e.to_string()))?;
        let mut rng: StdRng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let dt = 1.0 / span_days;
        let mut deviations: Vec<Vec<f64>> = vec![Vec::with_capacity(samples); n_future];
        for _ in 0..samples {
            let mut deviation = 0.0;
            let mut extra_rate = 0.0;
            for day in deviations.iter_mut() {
                if rng.gen::<f64>() < change_prob {
                    extra_rate += laplace.sample(&mut rng);
                }
                deviation += extra_rate * dt;
                day.push(deviation);
            }
        }

        let alpha = (1.0 - self.config.interval_width) / 2.0;
        let mut lower = Vec::with_capacity(n_future);
        let mut upper = Vec::with_capacity(n_future);
        for day in &deviations {
            let low = quantile(day, alpha).min(0.0);
            let up = quantile(day, 1.0 - alpha).max(0.0);
            // Uncertainty never shrinks further into the future.
            let prev_low = lower.last().copied().unwrap_or(0.0);
            let prev_up = upper.last().copied().unwrap_or(0.0);
            lower.push(low.min(prev_low));
            upper.push(up.max(prev_up));
        }
        Ok((lower, upper))
    }
}
