//! Backtesting a forecast against held-out history

use crate::artifacts::ModelArtifact;
use crate::data::{get_history, Dataset};
use crate::error::{ForecastError, Result};
use crate::forecaster::{ForecastResult, Forecaster};
use chrono::NaiveDate;
use sales_math::{error_metrics, ErrorMetrics};
use std::collections::HashMap;

/// Forecast made as of a past date, with the sales actually observed
#[derive(Debug, Clone)]
pub struct Backtest {
    pub forecast: ForecastResult,
    pub actual: Vec<f64>,
    pub metrics: ErrorMetrics,
}

/// Forecast `horizon_days` after `as_of` using only history up to `as_of`,
/// then score it against the dataset's observed sales for those days.
#[allow(clippy::too_many_arguments)]
pub fn backtest(
    forecaster: &Forecaster,
    artifact: &ModelArtifact,
    dataset: &Dataset,
    store: u32,
    item: u32,
    as_of: NaiveDate,
    horizon_days: usize,
    history_days: usize,
) -> Result<Backtest> {
    let window = get_history(dataset, store, item, Some(as_of), history_days);
    let seed_date = window.seed()?.date;
    if seed_date != as_of {
        return Err(ForecastError::DataError(format!(
            "No observation for store {}, item {} on {}; latest earlier row is {}",
            store, item, as_of, seed_date
        )));
    }
    let forecast = forecaster.forecast_history(artifact, &window, horizon_days)?;

    let observed: HashMap<NaiveDate, f64> = dataset
        .rows()
        .iter()
        .filter(|row| row.store == store && row.item == item && row.date > as_of)
        .map(|row| (row.date, row.unit_sales))
        .collect();

    let actual = forecast
        .iter()
        .map(|point| {
            observed.get(&point.date).copied().ok_or_else(|| {
                ForecastError::DataError(format!(
                    "No observed sales for store {}, item {} on {}",
                    store, item, point.date
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    let metrics = error_metrics(&forecast.values(), &actual)?;

    Ok(Backtest {
        forecast,
        actual,
        metrics,
    })
}
