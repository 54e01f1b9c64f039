//! The additive forecasting model: trend, seasonality, and the engine
//! that fits and projects them.

pub mod engine;
pub mod seasonal;
pub mod trend;

pub use engine::{EngineConfig, FittedModel, ForecastEngine};
pub use seasonal::{FourierTerm, SeasonalConfig, SeasonalModel};
pub use trend::{Changepoint, TimeScale, TrendModel};
