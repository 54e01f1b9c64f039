//! Composition root: fetch through the cache, fit, predict, and shape
//! the output for presentation.
//!
//! Every failure is recovered here into a structured [`PipelineResult`];
//! `run` never returns an error and never panics.

use crate::cache::{FetchOutcome, SeriesCache};
use crate::config::RequestConfig;
use crate::core::{Decomposition, ForecastTable, TimePoint};
use crate::error::ForecastError;
use crate::model::{EngineConfig, ForecastEngine};
use crate::source::{close_series, MarketDataSource};
use chrono::NaiveDate;
use tracing::{info, warn};

/// How many trailing points of the raw series the report carries.
const RAW_TAIL_LEN: usize = 5;

/// Everything the presentation layer needs: the recent raw history, the
/// full forecast table, and the separated components.
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub raw_tail: Vec<TimePoint>,
    pub forecast: ForecastTable,
    pub decomposition: Decomposition,
}

/// Structured outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub ok: bool,
    pub message: String,
    pub data: Option<ForecastReport>,
}

impl PipelineResult {
    fn success(report: ForecastReport) -> Self {
        Self {
            ok: true,
            message: "forecast complete".to_string(),
            data: Some(report),
        }
    }

    fn failure(error: &ForecastError) -> Self {
        Self {
            ok: false,
            message: error.to_string(),
            data: None,
        }
    }
}

/// Orchestrates cache, source, and engine for one request at a time.
pub struct Pipeline<S: MarketDataSource> {
    source: S,
    cache: SeriesCache,
    engine: ForecastEngine,
}

impl<S: MarketDataSource> Pipeline<S> {
    pub fn new(source: S) -> Self {
        Self::with_engine(source, ForecastEngine::new(EngineConfig::default()))
    }

    pub fn with_engine(source: S, engine: ForecastEngine) -> Self {
        Self {
            source,
            cache: SeriesCache::new(),
            engine,
        }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Run one forecast request end to end. Invalid parameters are
    /// rejected before any fetch; missing or unavailable data short-
    /// circuits before the engine is invoked.
    pub fn run(
        &self,
        ticker: &str,
        start_year: i32,
        horizon_years: u32,
        today: NaiveDate,
    ) -> PipelineResult {
        let config = match RequestConfig::new(ticker, start_year, horizon_years, today) {
            Ok(config) => config,
            Err(err) => {
                warn!(ticker, %err, "rejected request");
                return PipelineResult::failure(&err);
            }
        };

        let outcome = self.cache.get_or_fetch(
            config.ticker(),
            config.start_date(),
            today,
            |symbol, start, end| Ok(close_series(&self.source.fetch(symbol, start, end)?)),
        );
        let series = match outcome {
            FetchOutcome::Data(series) => series,
            FetchOutcome::Empty => {
                return PipelineResult::failure(&ForecastError::EmptyResult);
            }
            FetchOutcome::Unavailable(message) => {
                return PipelineResult::failure(&ForecastError::SourceUnavailable(message));
            }
        };

        let model = match self.engine.fit(&series) {
            Ok(model) => model,
            Err(err) => return PipelineResult::failure(&err),
        };
        let table = match self.engine.predict(&model, config.horizon_days()) {
            Ok(table) => table,
            Err(err) => return PipelineResult::failure(&err),
        };

        info!(
            ticker = config.ticker(),
            observations = series.len(),
            horizon_days = config.horizon_days(),
            "forecast complete"
        );
        PipelineResult::success(ForecastReport {
            raw_tail: series.tail(RAW_TAIL_LEN).to_vec(),
            decomposition: table.decomposition(),
            forecast: table,
        })
    }
}
