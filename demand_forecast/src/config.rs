//! Configuration for the forecasting workspace

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest horizon a single forecast may cover
pub const MAX_FORECAST_DAYS: usize = 30;

/// Default history lookback in days
pub const HISTORY_DAYS: usize = 180;

/// Capacity of the recent-sales buffer used for rolling averages
pub const SALES_BUFFER_CAPACITY: usize = 30;

/// Stores in the Guayas region covered by the sample data
pub const GUAYAS_STORES: [u32; 11] = [24, 26, 27, 28, 29, 30, 32, 34, 35, 36, 51];

/// Locations of the model artifacts and data files
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: Option<PathBuf>,
    pub metadata: PathBuf,
    pub dataset: PathBuf,
    pub lookup: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("artifacts/model.json"),
            scaler: Some(PathBuf::from("artifacts/scaler.json")),
            metadata: PathBuf::from("artifacts/model_config.json"),
            dataset: PathBuf::from("data/sample_forecast_data.csv"),
            lookup: PathBuf::from("data/store_item_lookup.csv"),
        }
    }
}

impl ArtifactPaths {
    /// Resolve relative paths against `base`
    pub fn relative_to(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };

        Self {
            model: join(&self.model),
            scaler: self.scaler.as_ref().map(join),
            metadata: join(&self.metadata),
            dataset: join(&self.dataset),
            lookup: join(&self.lookup),
        }
    }
}

/// Forecast settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Horizon cap in days
    pub max_forecast_days: usize,
    /// History lookback cap in days
    pub history_days: usize,
    /// Recent-sales buffer capacity
    pub sales_buffer_capacity: usize,
    /// First date a forecast may start from
    pub forecast_start: NaiveDate,
    /// Last date a forecast may start from
    pub forecast_end: NaiveDate,
    /// Stores offered for selection
    pub stores: Vec<u32>,
    pub artifacts: ArtifactPaths,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            max_forecast_days: MAX_FORECAST_DAYS,
            history_days: HISTORY_DAYS,
            sales_buffer_capacity: SALES_BUFFER_CAPACITY,
            forecast_start: NaiveDate::from_ymd_opt(2014, 1, 1).unwrap_or_default(),
            forecast_end: NaiveDate::from_ymd_opt(2014, 3, 31).unwrap_or_default(),
            stores: GUAYAS_STORES.to_vec(),
            artifacts: ArtifactPaths::default(),
        }
    }
}

impl ForecastConfig {
    /// Load a JSON config file; keys it leaves out keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: ForecastConfig = serde_json::from_str(&text).map_err(|e| {
            ForecastError::ConfigError(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_forecast_days == 0 {
            return Err(ForecastError::ConfigError(
                "max_forecast_days must be positive".to_string(),
            ));
        }
        if self.history_days == 0 {
            return Err(ForecastError::ConfigError(
                "history_days must be positive".to_string(),
            ));
        }
        if self.sales_buffer_capacity == 0 {
            return Err(ForecastError::ConfigError(
                "sales_buffer_capacity must be positive".to_string(),
            ));
        }
        if self.forecast_start > self.forecast_end {
            return Err(ForecastError::ConfigError(format!(
                "forecast_start {} is after forecast_end {}",
                self.forecast_start, self.forecast_end
            )));
        }
        Ok(())
    }

    /// Whether `date` lies inside the configured forecast window
    pub fn in_forecast_window(&self, date: NaiveDate) -> bool {
        date >= self.forecast_start && date <= self.forecast_end
    }

    /// `n_days` consecutive forecast dates beginning at `start`
    pub fn forecast_dates(start: NaiveDate, n_days: usize) -> Vec<NaiveDate> {
        sales_math::day_sequence(start, n_days)
    }
}
