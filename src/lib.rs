//! # stockcast
//!
//! Decomposable time-series forecasting core for daily price series.
//!
//! Fits an additive model over an irregularly-available daily history:
//! a piecewise-linear trend with automatically placed changepoints plus
//! truncated Fourier seasonal components (yearly, weekly), solved jointly
//! as an L2-regularized least-squares problem. Prediction extends the
//! index over future calendar days and attaches uncertainty bands from
//! stochastic simulation of future trend changes.
//!
//! The crate also provides the surrounding plumbing a forecasting wrapper
//! needs: a memoizing [`cache::SeriesCache`] over an injectable
//! [`source::MarketDataSource`], validated request parameters, and a
//! [`pipeline::Pipeline`] that recovers every failure into a structured
//! result.

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::cache::{FetchOutcome, SeriesCache};
    pub use crate::config::RequestConfig;
    pub use crate::core::{ForecastRow, ForecastTable, Series, TimePoint};
    pub use crate::error::{ForecastError, Result};
    pub use crate::model::{EngineConfig, FittedModel, ForecastEngine, SeasonalConfig};
    pub use crate::pipeline::{ForecastReport, Pipeline, PipelineResult};
    pub use crate::source::{MarketDataSource, OhlcRow};
}
