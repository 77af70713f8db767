//! Regression models used for one-step-ahead sales prediction

use crate::error::Result;
use crate::features::FeatureSchema;
use std::sync::Arc;

/// One-step-ahead predictor over a single feature row.
///
/// `features` follow the order the model was trained on. Implementations
/// may fail; they never need to clamp, the forecaster does that.
pub trait Regressor {
    /// Predict the next day's unit sales for one row
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Number of input features the model expects, when known
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Named feature order the model was trained on, when known.
    ///
    /// Seeds are re-aligned to this order before the first step.
    fn feature_schema(&self) -> Option<&Arc<FeatureSchema>> {
        None
    }

    /// Get the name of the model
    fn name(&self) -> &str {
        "regressor"
    }
}

impl<R: Regressor + ?Sized> Regressor for &R {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        (**self).predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }

    fn feature_schema(&self) -> Option<&Arc<FeatureSchema>> {
        (**self).feature_schema()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        (**self).predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }

    fn feature_schema(&self) -> Option<&Arc<FeatureSchema>> {
        (**self).feature_schema()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod gbdt;
pub mod scaler;

pub use gbdt::{GradientBoostedTrees, Node, RegressionTree};
pub use scaler::StandardScaler;
