#![allow(dead_code)]

use chrono::{Datelike, Days, NaiveDate};
use demand_forecast::features::{names, FeatureSchema, FeatureVector, CANONICAL_FEATURES};
use demand_forecast::{ForecastError, Regressor, Result};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn canonical_schema() -> Arc<FeatureSchema> {
    Arc::new(FeatureSchema::canonical())
}

pub fn seed_vector(pairs: &[(&str, f64)]) -> FeatureVector {
    FeatureVector::from_named(canonical_schema(), pairs).unwrap()
}

/// Predicts `lag1 * factor`
pub struct LagGrowth {
    pub lag1_idx: usize,
    pub factor: f64,
}

impl LagGrowth {
    pub fn new(schema: &FeatureSchema, factor: f64) -> Self {
        Self {
            lag1_idx: schema.position(names::UNIT_SALES_LAG1).unwrap(),
            factor,
        }
    }
}

impl Regressor for LagGrowth {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        Ok(features[self.lag1_idx] * self.factor)
    }
}

/// Returns a fixed value and counts calls
pub struct Counting {
    pub value: f64,
    pub calls: Cell<usize>,
}

impl Counting {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            calls: Cell::new(0),
        }
    }
}

impl Regressor for Counting {
    fn predict(&self, _features: &[f64]) -> Result<f64> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.value)
    }
}

/// Succeeds with `value` until call number `fail_on` (1-based), which errors
pub struct FailOnCall {
    pub value: f64,
    pub fail_on: usize,
    pub calls: Cell<usize>,
}

impl Regressor for FailOnCall {
    fn predict(&self, _features: &[f64]) -> Result<f64> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(ForecastError::PredictionError("model crashed".to_string()));
        }
        Ok(self.value)
    }
}

/// Weekly sales pattern used by the synthetic dataset
pub fn synthetic_sales(day: u64) -> f64 {
    3.0 + (day % 7) as f64
}

/// Write a dataset CSV for one store-item pair with `days` consecutive rows.
///
/// Feature columns are written in reverse canonical order so loading has
/// to re-align them by name.
pub fn write_dataset_csv(dir: &Path, store: u32, item: u32, start: NaiveDate, days: u64) -> PathBuf {
    let mut features: Vec<&str> = CANONICAL_FEATURES.to_vec();
    features.reverse();

    let mut text = format!("store_nbr,item_nbr,date,unit_sales,{}\n", features.join(","));
    for day in 0..days {
        let current = start.checked_add_days(Days::new(day)).unwrap();
        let sales = synthetic_sales(day);
        let lag1 = if day == 0 {
            String::new()
        } else {
            synthetic_sales(day - 1).to_string()
        };
        let values: Vec<String> = features
            .iter()
            .map(|name| match *name {
                names::UNIT_SALES_LAG1 => lag1.clone(),
                names::UNIT_SALES_7D_AVG => "6".to_string(),
                names::DAY_OF_WEEK => current.weekday().num_days_from_monday().to_string(),
                names::DAY_OF_MONTH => current.day().to_string(),
                names::MONTH => current.month().to_string(),
                names::YEAR => current.year().to_string(),
                names::STORE_CLUSTER => "10".to_string(),
                _ => "0".to_string(),
            })
            .collect();
        text.push_str(&format!(
            "{},{},{},{},{}\n",
            store,
            item,
            current,
            sales,
            values.join(",")
        ));
    }

    let path = dir.join(format!("dataset_{}_{}.csv", store, item));
    fs::write(&path, text).unwrap();
    path
}

pub struct ArtifactFiles {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metadata: PathBuf,
}

/// Two-tree model over the canonical schema:
/// lag1 below 5 -> 4 else 8, plus 2 on weekends.
/// The scaler halves lag1, so the first split sits at 2.5 in scaled space.
pub fn write_artifacts(dir: &Path) -> ArtifactFiles {
    let schema = FeatureSchema::canonical();
    let lag1 = schema.position(names::UNIT_SALES_LAG1).unwrap();
    let weekend = schema.position(names::IS_WEEKEND).unwrap();

    let model = format!(
        r#"{{
  "base_score": 0.0,
  "trees": [
    {{"nodes": [
      {{"feature": {lag1}, "threshold": 2.5, "left": 1, "right": 2}},
      {{"leaf": 4.0}},
      {{"leaf": 8.0}}
    ]}},
    {{"nodes": [
      {{"feature": {weekend}, "threshold": 0.5, "left": 1, "right": 2}},
      {{"leaf": 0.0}},
      {{"leaf": 2.0}}
    ]}}
  ]
}}"#
    );

    let mut scale = vec![1.0; schema.len()];
    scale[lag1] = 2.0;
    let scaler = serde_json::json!({
        "mean": vec![0.0; schema.len()],
        "scale": scale,
    });

    let metadata = serde_json::json!({
        "feature_columns": CANONICAL_FEATURES.to_vec(),
        "model": {
            "model_type": "xgboost",
            "training_period": {"start": "2013-01-01", "end": "2013-12-31"},
            "training_samples": 100000,
            "metrics": {"rmse": 6.4, "mae": 3.2, "bias": 0.1, "mape": 41.0},
            "hyperparameters": {"max_depth": 6, "learning_rate": 0.1}
        }
    });

    let files = ArtifactFiles {
        model: dir.join("model.json"),
        scaler: dir.join("scaler.json"),
        metadata: dir.join("model_config.json"),
    };
    fs::write(&files.model, model).unwrap();
    fs::write(&files.scaler, scaler.to_string()).unwrap();
    fs::write(&files.metadata, metadata.to_string()).unwrap();
    files
}
