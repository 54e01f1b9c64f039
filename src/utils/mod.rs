//! Numeric utilities shared by the model layer.

pub mod ridge;
pub mod stats;

pub use ridge::ridge_solve;
pub use stats::{mean, quantile, quantile_normal, std_dev, variance};
