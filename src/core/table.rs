//! Forecast output table and component decomposition.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One forecast row: point estimate, interval bounds, and the additive
/// components it was assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub date: NaiveDate,
    /// Trend component value.
    pub trend: f64,
    /// Seasonal contribution per component name (e.g. "yearly", "weekly").
    pub seasonal: BTreeMap<String, f64>,
    /// Point forecast: trend plus all seasonal contributions.
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

impl ForecastRow {
    /// Sum of all seasonal contributions for this row.
    pub fn seasonal_total(&self) -> f64 {
        self.seasonal.values().sum()
    }
}

/// The full forecast output: one row per date in the extended index
/// (training history followed by the future horizon).
#[derive(Debug, Clone, Default)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

/// Separated component series for plotting trend and each seasonality
/// independently of the combined forecast.
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    pub trend: Vec<(NaiveDate, f64)>,
    pub seasonal: BTreeMap<String, Vec<(NaiveDate, f64)>>,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last `n` rows (fewer if the table is shorter).
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        let start = self.rows.len().saturating_sub(n);
        &self.rows[start..]
    }

    /// Names of the seasonal components present in the table.
    pub fn component_names(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.seasonal.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Split the table into per-component series.
    pub fn decomposition(&self) -> Decomposition {
        let mut decomposition = Decomposition::default();
        for row in &self.rows {
            decomposition.trend.push((row.date, row.trend));
            for (name, value) in &row.seasonal {
                decomposition
                    .seasonal
                    .entry(name.clone())
                    .or_default()
                    .push((row.date, *value));
            }
        }
        decomposition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn make_row(d: u32, trend: f64, yearly: f64) -> ForecastRow {
        let mut seasonal = BTreeMap::new();
        seasonal.insert("yearly".to_string(), yearly);
        ForecastRow {
            date: date(d),
            trend,
            seasonal,
            yhat: trend + yearly,
            yhat_lower: trend + yearly - 1.0,
            yhat_upper: trend + yearly + 1.0,
        }
    }

    #[test]
    fn seasonal_total_sums_components() {
        let mut row = make_row(1, 10.0, 2.0);
        row.seasonal.insert("weekly".to_string(), 0.5);
        assert_eq!(row.seasonal_total(), 2.5);
    }

    #[test]
    fn tail_returns_last_rows() {
        let table = ForecastTable::new(vec![
            make_row(1, 10.0, 1.0),
            make_row(2, 11.0, 1.0),
            make_row(3, 12.0, 1.0),
        ]);
        let tail = table.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].date, date(2));
    }

    #[test]
    fn decomposition_separates_components() {
        let table = ForecastTable::new(vec![make_row(1, 10.0, 2.0), make_row(2, 11.0, -2.0)]);
        let decomposition = table.decomposition();

        assert_eq!(decomposition.trend, vec![(date(1), 10.0), (date(2), 11.0)]);
        let yearly = &decomposition.seasonal["yearly"];
        assert_eq!(yearly, &vec![(date(1), 2.0), (date(2), -2.0)]);
    }

    #[test]
    fn component_names_from_first_row() {
        let table = ForecastTable::new(vec![make_row(1, 10.0, 2.0)]);
        assert_eq!(table.component_names(), vec!["yearly".to_string()]);
        assert!(ForecastTable::default().component_names().is_empty());
    }
}
