//! Forecast error statistics
//!
//! The same four measures are reported in the model metadata (RMSE, MAE,
//! bias, MAPE), so a backtest can be compared against training metrics.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Error measures for a forecast against observed values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean of `forecast - actual`; positive means over-forecasting
    pub bias: f64,
    /// Mean Absolute Percentage Error over days with non-zero actual sales
    pub mape: f64,
}

/// Compute error metrics for `forecast` against `actual`.
///
/// Days with zero actual sales are left out of MAPE; when every actual is
/// zero MAPE is reported as 0.
pub fn error_metrics(forecast: &[f64], actual: &[f64]) -> Result<ErrorMetrics> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(MathError::InvalidInput(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let n = forecast.len() as f64;

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| f - a)
        .collect();

    if errors.iter().any(|e| !e.is_finite()) {
        return Err(MathError::CalculationError(
            "Forecast or actual values contain non-finite entries".to_string(),
        ));
    }

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let bias = errors.iter().sum::<f64>() / n;

    let (pct_sum, pct_count) = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .fold((0.0, 0usize), |(sum, count), (&a, &e)| {
            (sum + e.abs() / a.abs() * 100.0, count + 1)
        });
    let mape = if pct_count > 0 {
        pct_sum / pct_count as f64
    } else {
        0.0
    };

    Ok(ErrorMetrics {
        rmse: mse.sqrt(),
        mae,
        bias,
        mape,
    })
}

impl std::fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  Bias:  {:.4}", self.bias)?;
        writeln!(f, "  MAPE:  {:.2}%", self.mape)?;
        Ok(())
    }
}
