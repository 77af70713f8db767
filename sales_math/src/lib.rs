//! # Sales Math
//!
//! Numeric building blocks for unit-sales forecasting.
//! This crate provides the bounded rolling window used to derive rolling
//! averages during an autoregressive forecast, forecast error statistics
//! and the calendar features that advance with the forecast date.

use thiserror::Error;

pub mod calendar;
pub mod rolling;
pub mod stats;

pub use calendar::{day_sequence, CalendarFeatures};
pub use rolling::RollingWindow;
pub use stats::{error_metrics, ErrorMetrics};

/// Errors that can occur in sales calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
