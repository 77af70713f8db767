//! # Demand Forecast
//!
//! Multi-day unit-sales forecasting for a store/item pair from a pretrained
//! gradient-boosted regression model.
//!
//! ## Features
//!
//! - Model artifacts (tree ensemble, optional scaler, feature metadata) with a load-once cache
//! - Historical feature data keyed by (store, item, date)
//! - Autoregressive forecasting: each day's prediction feeds the next day's features
//! - Backtests scored with RMSE, MAE, bias and MAPE
//! - CSV export of forecasts and history
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::artifacts::ArtifactLoader;
//! use demand_forecast::data::Dataset;
//! use demand_forecast::export::to_csv_string;
//! use demand_forecast::forecaster::Forecaster;
//!
//! # fn main() -> demand_forecast::Result<()> {
//! // Load the model and its feature order
//! let artifact = ArtifactLoader::load(
//!     "artifacts/model.json",
//!     Some("artifacts/scaler.json"),
//!     "artifacts/model_config.json",
//! )?;
//!
//! // Pick the last 180 days of history for store 24, item 105574
//! let dataset = Dataset::from_csv("data/sample_forecast_data.csv")?;
//! let history = dataset.history(24, 105574, None, 180);
//!
//! // Forecast two weeks ahead
//! let forecast = Forecaster::default().forecast_history(&artifact, &history, 14)?;
//! println!("{}", to_csv_string(&forecast)?);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod export;
pub mod features;
pub mod forecaster;
pub mod lookup;
pub mod models;

// Re-export commonly used types
pub use crate::artifacts::{ArtifactCache, ArtifactLoader, ModelArtifact, ModelMetadata};
pub use crate::config::{ForecastConfig, HISTORY_DAYS, MAX_FORECAST_DAYS};
pub use crate::data::{get_history, Dataset, HistoryWindow};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureSchema, FeatureVector};
pub use crate::forecaster::{forecast, ForecastResult, ForecastTrace, Forecaster};
pub use crate::lookup::LookupTable;
pub use crate::models::Regressor;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
