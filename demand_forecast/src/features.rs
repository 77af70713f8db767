//! Feature schema and named feature vectors
//!
//! A [`FeatureSchema`] fixes the order in which a model expects its inputs
//! and maps every feature name to its position. A [`FeatureVector`] is a row
//! of values bound to a schema, so callers read and write fields by name.

use crate::error::{ForecastError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Feature names used by the forecasting loop and the canonical schema.
pub mod names {
    // Lag and rolling-window sales
    pub const UNIT_SALES_LAG1: &str = "unit_sales_lag1";
    pub const UNIT_SALES_LAG7: &str = "unit_sales_lag7";
    pub const UNIT_SALES_LAG14: &str = "unit_sales_lag14";
    pub const UNIT_SALES_LAG30: &str = "unit_sales_lag30";
    pub const UNIT_SALES_7D_AVG: &str = "unit_sales_7d_avg";
    pub const UNIT_SALES_14D_AVG: &str = "unit_sales_14d_avg";
    pub const UNIT_SALES_30D_AVG: &str = "unit_sales_30d_avg";
    pub const UNIT_SALES_7D_STD: &str = "unit_sales_7d_std";

    // Calendar
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const DAY_OF_MONTH: &str = "day_of_month";
    pub const MONTH: &str = "month";
    pub const YEAR: &str = "year";
    pub const WEEK_OF_YEAR: &str = "week_of_year";
    pub const QUARTER: &str = "quarter";
    pub const IS_WEEKEND: &str = "is_weekend";

    // Holidays
    pub const IS_HOLIDAY: &str = "is_holiday";
    pub const IS_NATIONAL_HOLIDAY: &str = "is_national_holiday";
    pub const DAYS_TO_HOLIDAY: &str = "days_to_holiday";
    pub const DAYS_FROM_HOLIDAY: &str = "days_from_holiday";

    // Promotions
    pub const ONPROMOTION: &str = "onpromotion";
    pub const PROMO_LAST_7D: &str = "promo_last_7d";

    // Store and item aggregates
    pub const STORE_AVG_SALES: &str = "store_avg_sales";
    pub const ITEM_AVG_SALES: &str = "item_avg_sales";
    pub const STORE_ITEM_AVG_SALES: &str = "store_item_avg_sales";
    pub const STORE_ITEM_STD_SALES: &str = "store_item_std_sales";
    pub const FAMILY_AVG_SALES: &str = "family_avg_sales";
    pub const STORE_TYPE_CODE: &str = "store_type_code";
    pub const STORE_CLUSTER: &str = "store_cluster";

    // Derived flags
    pub const IS_PAYDAY: &str = "is_payday";
    pub const IS_MONTH_START: &str = "is_month_start";
    pub const IS_MONTH_END: &str = "is_month_end";
    pub const IS_EARTHQUAKE_PERIOD: &str = "is_earthquake_period";
    pub const PERISHABLE: &str = "perishable";
}

/// The 33-field schema the production model is trained on, in training order.
pub const CANONICAL_FEATURES: [&str; 33] = [
    names::UNIT_SALES_LAG1,
    names::UNIT_SALES_LAG7,
    names::UNIT_SALES_LAG14,
    names::UNIT_SALES_LAG30,
    names::UNIT_SALES_7D_AVG,
    names::UNIT_SALES_14D_AVG,
    names::UNIT_SALES_30D_AVG,
    names::UNIT_SALES_7D_STD,
    names::DAY_OF_WEEK,
    names::DAY_OF_MONTH,
    names::MONTH,
    names::YEAR,
    names::WEEK_OF_YEAR,
    names::QUARTER,
    names::IS_WEEKEND,
    names::IS_HOLIDAY,
    names::IS_NATIONAL_HOLIDAY,
    names::DAYS_TO_HOLIDAY,
    names::DAYS_FROM_HOLIDAY,
    names::ONPROMOTION,
    names::PROMO_LAST_7D,
    names::STORE_AVG_SALES,
    names::ITEM_AVG_SALES,
    names::STORE_ITEM_AVG_SALES,
    names::STORE_ITEM_STD_SALES,
    names::FAMILY_AVG_SALES,
    names::STORE_TYPE_CODE,
    names::STORE_CLUSTER,
    names::IS_PAYDAY,
    names::IS_MONTH_START,
    names::IS_MONTH_END,
    names::IS_EARTHQUAKE_PERIOD,
    names::PERISHABLE,
];

/// Ordered feature names with a precomputed name -> position map
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from names in model order.
    ///
    /// Names must be non-empty and unique.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());

        for (idx, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ForecastError::ValidationError(format!(
                    "Feature name at position {} is empty",
                    idx
                )));
            }
            if positions.insert(name.clone(), idx).is_some() {
                return Err(ForecastError::ValidationError(format!(
                    "Duplicate feature name '{}'",
                    name
                )));
            }
        }

        Ok(Self { names, positions })
    }

    /// The canonical 33-field schema
    pub fn canonical() -> Self {
        let names: Vec<String> = CANONICAL_FEATURES.iter().map(|n| n.to_string()).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name`, if the schema has it
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

/// A row of feature values bound to a schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: Arc<FeatureSchema>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Create a vector; `values` must follow the schema order
    pub fn new(schema: Arc<FeatureSchema>, values: Vec<f64>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(ForecastError::ValidationError(format!(
                "Feature vector has {} values but the schema has {} features",
                values.len(),
                schema.len()
            )));
        }

        Ok(Self { schema, values })
    }

    /// Create a vector from `(name, value)` pairs; unnamed fields are 0.0
    pub fn from_named(schema: Arc<FeatureSchema>, pairs: &[(&str, f64)]) -> Result<Self> {
        let mut values = vec![0.0; schema.len()];
        for (name, value) in pairs {
            let idx = schema.position(name).ok_or_else(|| {
                ForecastError::ValidationError(format!("Unknown feature '{}'", name))
            })?;
            values[idx] = *value;
        }

        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Values in schema order, ready to feed a model as a single row
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|idx| self.values[idx])
    }

    /// Set a field by name; returns `false` if the schema has no such field
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match self.schema.position(name) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn get_at(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied()
    }

    pub(crate) fn set_at(&mut self, idx: usize, value: f64) {
        self.values[idx] = value;
    }

    /// Re-order this vector into `target`'s order, matching fields by name.
    ///
    /// Extra fields are dropped; a field `target` needs but this vector
    /// lacks is a data error.
    pub fn align_to(&self, target: &Arc<FeatureSchema>) -> Result<FeatureVector> {
        if Arc::ptr_eq(&self.schema, target) || self.schema.names() == target.names() {
            return Ok(FeatureVector {
                schema: Arc::clone(target),
                values: self.values.clone(),
            });
        }

        let values = target
            .names()
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Feature '{}' required by the model is missing from the data",
                        name
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(FeatureVector {
            schema: Arc::clone(target),
            values,
        })
    }
}
