//! Core data structures: series and forecast tables.

pub mod series;
pub mod table;

pub use series::{Series, TimePoint};
pub use table::{Decomposition, ForecastRow, ForecastTable};
