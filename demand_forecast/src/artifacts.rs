//! Loading and caching of trained model artifacts
//!
//! An artifact is three files: the tree ensemble, an optional feature
//! scaler and a metadata document carrying the feature order. Once loaded
//! the [`ModelArtifact`] is immutable and shared behind an `Arc`.

use crate::config::ArtifactPaths;
use crate::error::{ForecastError, Result};
use crate::features::FeatureSchema;
use crate::models::{GradientBoostedTrees, Regressor, StandardScaler};
use sales_math::ErrorMetrics;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Period of the training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPeriod {
    pub start: String,
    pub end: String,
}

/// Descriptive block of the metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    #[serde(default)]
    pub training_period: Option<TrainingPeriod>,
    #[serde(default)]
    pub training_samples: Option<u64>,
    #[serde(default)]
    pub metrics: Option<ErrorMetrics>,
    #[serde(default)]
    pub hyperparameters: BTreeMap<String, serde_json::Value>,
}

/// Metadata document: feature order plus model description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub feature_columns: Vec<String>,
    pub model: ModelInfo,
}

/// A loaded model, its feature schema, optional scaler and metadata
#[derive(Debug)]
pub struct ModelArtifact {
    model: GradientBoostedTrees,
    scaler: Option<StandardScaler>,
    schema: Arc<FeatureSchema>,
    metadata: ModelMetadata,
}

impl ModelArtifact {
    /// Assemble an artifact from parts, checking they agree with each other
    pub fn new(
        model: GradientBoostedTrees,
        scaler: Option<StandardScaler>,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        let schema = FeatureSchema::new(metadata.feature_columns.iter().cloned())?;
        if schema.is_empty() {
            return Err(ForecastError::ValidationError(
                "feature_columns is empty".to_string(),
            ));
        }
        model.validate(schema.len())?;
        if let Some(scaler) = &scaler {
            scaler.validate(schema.len())?;
        }

        Ok(Self {
            model,
            scaler,
            schema: Arc::new(schema),
            metadata,
        })
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn model(&self) -> &GradientBoostedTrees {
        &self.model
    }

    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }

    /// Scale and predict several rows at once
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.schema.len() {
            return Err(ForecastError::PredictionError(format!(
                "Row has {} values, model expects {}",
                features.len(),
                self.schema.len()
            )));
        }

        match &self.scaler {
            Some(scaler) => {
                let scaled = scaler.transform(features)?;
                self.model.predict(&scaled)
            }
            None => self.model.predict(features),
        }
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.schema.len())
    }

    fn feature_schema(&self) -> Option<&Arc<FeatureSchema>> {
        Some(&self.schema)
    }

    fn name(&self) -> &str {
        &self.metadata.model.model_type
    }
}

/// Reads artifact files from disk
#[derive(Debug)]
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Load model, optional scaler and metadata into a validated artifact
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        scaler_path: Option<P>,
        metadata_path: P,
    ) -> Result<ModelArtifact> {
        let model_path = model_path.as_ref();
        let metadata_path = metadata_path.as_ref();

        let model: GradientBoostedTrees = read_json(model_path)?;
        let scaler: Option<StandardScaler> = match scaler_path {
            Some(path) => Some(read_json(path.as_ref())?),
            None => None,
        };
        let metadata = Self::load_metadata(metadata_path)?;

        let artifact = ModelArtifact::new(model, scaler, metadata).map_err(|e| {
            ForecastError::ArtifactLoadError(format!(
                "{} is inconsistent: {}",
                model_path.display(),
                e
            ))
        })?;

        info!(
            model = %model_path.display(),
            trees = artifact.model.trees.len(),
            features = artifact.schema.len(),
            scaled = artifact.scaler.is_some(),
            "loaded model artifact"
        );
        Ok(artifact)
    }

    /// Load an artifact from configured paths
    pub fn load_paths(paths: &ArtifactPaths) -> Result<ModelArtifact> {
        Self::load(
            paths.model.as_path(),
            paths.scaler.as_deref(),
            paths.metadata.as_path(),
        )
    }

    /// Read the metadata document on its own
    pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<ModelMetadata> {
        read_json(path.as_ref())
    }

    /// Read a bare JSON list of feature names
    pub fn load_feature_columns<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        read_json(path.as_ref())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        ForecastError::ArtifactLoadError(format!("Cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        ForecastError::ArtifactLoadError(format!("Invalid {}: {}", path.display(), e))
    })
}

/// Load-once cache for a model artifact.
///
/// Readers share one `Arc<ModelArtifact>`; `reload` swaps in a fresh load
/// and `invalidate` forces the next `get_or_load` to hit the disk again.
#[derive(Debug)]
pub struct ArtifactCache {
    paths: ArtifactPaths,
    slot: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ArtifactCache {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            slot: RwLock::new(None),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Cached artifact, loading it on first use
    pub fn get_or_load(&self) -> Result<Arc<ModelArtifact>> {
        if let Some(artifact) = self.cached() {
            return Ok(artifact);
        }

        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        // another caller may have loaded it while we waited for the lock
        if let Some(artifact) = slot.as_ref() {
            return Ok(Arc::clone(artifact));
        }
        let artifact = Arc::new(ArtifactLoader::load_paths(&self.paths)?);
        *slot = Some(Arc::clone(&artifact));
        Ok(artifact)
    }

    /// Load from disk now and replace the cached artifact.
    ///
    /// On failure the previously cached artifact stays in place.
    pub fn reload(&self) -> Result<Arc<ModelArtifact>> {
        let artifact = Arc::new(ArtifactLoader::load_paths(&self.paths)?);
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Arc::clone(&artifact));
        info!(model = %self.paths.model.display(), "reloaded model artifact");
        Ok(artifact)
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }

    /// Currently cached artifact without touching the disk
    pub fn cached(&self) -> Option<Arc<ModelArtifact>> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(Arc::clone)
    }
}
