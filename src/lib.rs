//! # Demand Forecast Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`sales_math`]: rolling windows, error statistics and calendar helpers
//! - [`demand_forecast`]: model artifacts, history access and the autoregressive forecaster
//!
//! ## Example
//!
//! ```
//! use demand_forecast_workspace::demand_forecast::features::{names, FeatureSchema, FeatureVector};
//! use demand_forecast_workspace::demand_forecast::{forecast, Regressor, Result};
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! struct Flat;
//!
//! impl Regressor for Flat {
//!     fn predict(&self, _features: &[f64]) -> Result<f64> {
//!         Ok(3.0)
//!     }
//! }
//!
//! let schema = Arc::new(FeatureSchema::canonical());
//! let seed = FeatureVector::from_named(schema, &[(names::UNIT_SALES_LAG1, 4.0)]).unwrap();
//! let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
//!
//! let result = forecast(&Flat, &seed, start, &[], 7).unwrap();
//! assert_eq!(result.len(), 7);
//! assert_eq!(result.total(), 21.0);
//! ```

pub use demand_forecast;
pub use sales_math;
