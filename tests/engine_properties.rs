//! Model-level properties of the forecasting engine, verified end to end
//! on synthetic series.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stockcast::core::Series;
use stockcast::model::{EngineConfig, ForecastEngine, SeasonalConfig};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_series(values: &[f64]) -> Series {
    let dates: Vec<NaiveDate> = (0..values.len())
        .map(|i| date(2018, 1, 1) + Duration::days(i as i64))
        .collect();
    Series::from_parts(dates, values.to_vec()).unwrap()
}

/// 1000 daily points of `10 + 0.01*day + 5*sin(2π*day/365.25)` plus
/// small uniform noise.
fn synthetic_trend_plus_yearly() -> Series {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<f64> = (0..1000)
        .map(|day| {
            let t = day as f64;
            10.0 + 0.01 * t
                + 5.0 * (std::f64::consts::TAU * t / 365.25).sin()
                + rng.gen_range(-0.25..0.25)
        })
        .collect();
    make_series(&values)
}

fn engine() -> ForecastEngine {
    ForecastEngine::new(EngineConfig::default().with_seed(42))
}

#[test]
fn recovers_slope_and_yearly_amplitude_within_20_percent() {
    let series = synthetic_trend_plus_yearly();
    let model = engine().fit(&series).unwrap();
    let table = engine().predict(&model, 365).unwrap();

    // Average daily slope of the trend component over the history
    let decomposition = table.decomposition();
    let trend = &decomposition.trend;
    let (first_date, first_value) = trend[0];
    let (last_date, last_value) = trend[series.len() - 1];
    let slope = (last_value - first_value) / (last_date - first_date).num_days() as f64;
    assert_relative_eq!(slope, 0.01, max_relative = 0.2);

    let yearly = model.seasonal("yearly").expect("yearly enabled");
    assert_relative_eq!(yearly.amplitude(), 5.0, max_relative = 0.2);
}

#[test]
fn seasonality_does_not_increase_in_sample_error() {
    let series = synthetic_trend_plus_yearly();

    let full = engine().fit(&series).unwrap();
    let trend_only = ForecastEngine::new(
        EngineConfig::default()
            .with_seed(42)
            .with_seasonalities(Vec::new()),
    )
    .fit(&series)
    .unwrap();

    let ssr = |residuals: &[f64]| residuals.iter().map(|r| r * r).sum::<f64>();
    assert!(ssr(full.residuals()) <= ssr(trend_only.residuals()));
}

#[test]
fn trend_is_continuous_at_every_fitted_changepoint() {
    // Series with a genuine slope break to exercise the changepoints
    let values: Vec<f64> = (0..600)
        .map(|day| {
            if day < 300 {
                100.0 + 0.2 * day as f64
            } else {
                160.0 - 0.1 * (day - 300) as f64
            }
        })
        .collect();
    let model = engine().fit(&make_series(&values)).unwrap();
    let trend = model.trend();
    assert!(!trend.changepoints().is_empty());

    for cp in trend.changepoints() {
        let s = trend.scale().position(cp.date);
        let eps = 1e-9;
        assert_relative_eq!(
            trend.value_at(s - eps),
            trend.value_at(s + eps),
            epsilon = 1e-6
        );
    }
}

#[test]
fn fitted_weekly_component_is_periodic_into_the_future() {
    // Strong weekday pattern over half a year
    let values: Vec<f64> = (0..180)
        .map(|day| 50.0 + 3.0 * (std::f64::consts::TAU * day as f64 / 7.0).cos())
        .collect();
    let model = engine().fit(&make_series(&values)).unwrap();
    let weekly = model.seasonal("weekly").expect("weekly enabled");

    let far_future = date(2030, 6, 3);
    for weeks in [1i64, 52, 520] {
        assert_relative_eq!(
            weekly.evaluate(far_future),
            weekly.evaluate(far_future + Duration::days(7 * weeks)),
            epsilon = 1e-9
        );
    }
}

#[test]
fn uncertainty_grows_with_the_horizon() {
    let series = synthetic_trend_plus_yearly();
    let model = engine().fit(&series).unwrap();
    let table = engine().predict(&model, 365).unwrap();

    let width = |row: &stockcast::core::ForecastRow| row.yhat_upper - row.yhat_lower;
    let rows = table.rows();
    let n_history = series.len();

    let near = width(&rows[n_history + 30]);
    let far = width(&rows[n_history + 300]);
    assert!(far >= near, "far {} < near {}", far, near);

    // And the whole sequence of widths is non-decreasing
    for pair in rows.windows(2) {
        assert!(width(&pair[1]) >= width(&pair[0]) - 1e-9);
    }
}

#[test]
fn refit_on_identical_series_is_identical() {
    let series = synthetic_trend_plus_yearly();
    let m1 = engine().fit(&series).unwrap();
    let m2 = engine().fit(&series).unwrap();

    assert_eq!(m1.trend(), m2.trend());
    assert_eq!(m1.seasonals(), m2.seasonals());
    assert_eq!(m1.sigma_obs(), m2.sigma_obs());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn forecast_covers_history_plus_horizon(
        n in 2usize..200,
        horizon in 0i64..60,
        base in 1.0..500.0f64,
        slope in -1.0..1.0f64,
    ) {
        let values: Vec<f64> = (0..n).map(|i| base + slope * i as f64).collect();
        let series = make_series(&values);
        let model = engine().fit(&series).unwrap();
        let table = engine().predict(&model, horizon).unwrap();

        prop_assert_eq!(table.len(), n + horizon as usize);
        for row in table.rows() {
            prop_assert!(row.yhat.is_finite());
            prop_assert!(row.yhat_lower <= row.yhat && row.yhat <= row.yhat_upper);
        }
    }

    #[test]
    fn seasonal_evaluation_is_periodic_for_any_coefficients(
        a in -10.0..10.0f64,
        b in -10.0..10.0f64,
        offset_days in 0i64..5000,
    ) {
        use stockcast::model::SeasonalModel;
        let config = SeasonalConfig::weekly();
        let component = SeasonalModel::from_coefficients(
            &config,
            &[a, b, a / 2.0, b / 2.0, a / 3.0, b / 3.0],
        );
        let t = date(2020, 1, 1) + Duration::days(offset_days);
        let shifted = t + Duration::days(7);
        prop_assert!((component.evaluate(t) - component.evaluate(shifted)).abs() < 1e-9);
    }
}
