//! Standard-score feature scaling applied before prediction

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Per-feature `(x - mean) / scale` transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate(scaler.mean.len())?;
        Ok(scaler)
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Check that both parameter vectors cover `n_features` finite values
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.mean.len() != n_features || self.scale.len() != n_features {
            return Err(ForecastError::ValidationError(format!(
                "Scaler has {} means and {} scales, expected {}",
                self.mean.len(),
                self.scale.len(),
                n_features
            )));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(ForecastError::ValidationError(
                "Scaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Scale one row into `out`, reusing its allocation
    pub fn transform_into(&self, row: &[f64], out: &mut Vec<f64>) -> Result<()> {
        if row.len() != self.mean.len() {
            return Err(ForecastError::ValidationError(format!(
                "Row has {} values, scaler expects {}",
                row.len(),
                self.mean.len()
            )));
        }

        out.clear();
        out.extend(
            row.iter()
                .zip(self.mean.iter().zip(self.scale.iter()))
                .map(|(&x, (&mean, &scale))| {
                    // zero-variance features are centred only
                    let scale = if scale == 0.0 { 1.0 } else { scale };
                    (x - mean) / scale
                }),
        );
        Ok(())
    }

    /// Scale one row
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(row.len());
        self.transform_into(row, &mut out)?;
        Ok(out)
    }
}
