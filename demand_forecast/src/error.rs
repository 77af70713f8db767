//! Error types for the demand_forecast crate

use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Missing, unreadable or structurally invalid model, scaler or metadata file
    #[error("Artifact load error: {0}")]
    ArtifactLoadError(String),

    /// No historical rows exist for the requested store-item pair
    #[error("No history for store {store}, item {item}")]
    EmptyHistoryError { store: u32, item: u32 },

    /// The model failed or produced a non-finite value
    #[error("Prediction error: {0}")]
    PredictionError(String),

    /// Requested horizon is zero or above the configured cap
    #[error("Invalid horizon: {requested} days requested, allowed range is 1..={max}")]
    InvalidHorizonError { requested: usize, max: usize },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON parsing
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Error from rolling-window or statistics calculations
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}
