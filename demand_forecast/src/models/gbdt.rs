//! Gradient-boosted regression trees
//!
//! Models are stored as JSON:
//!
//! ```json
//! {
//!   "base_score": 0.5,
//!   "learning_rate": 1.0,
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"feature": 0, "threshold": 4.5, "left": 1, "right": 2, "missing_left": true},
//!         {"leaf": -0.25},
//!         {"leaf": 1.75}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A row goes left when `value < threshold`. NaN values follow
//! `missing_left`. Child indices always point forward, so traversal
//! terminates for every validated tree.

use crate::error::{ForecastError, Result};
use crate::models::Regressor;
use serde::{Deserialize, Serialize};

fn default_missing_left() -> bool {
    true
}

fn default_learning_rate() -> f64 {
    1.0
}

/// A tree node: either a split on one feature or a leaf value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
            missing_left: true,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Node::Leaf { leaf: value }
    }
}

/// A single regression tree in flat node layout (root at index 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Check node references against the feature count
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ForecastError::ValidationError(
                "Tree has no nodes".to_string(),
            ));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if feature >= n_features {
                        return Err(ForecastError::ValidationError(format!(
                            "Node {} splits on feature {} but the model has {} features",
                            idx, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ForecastError::ValidationError(format!(
                            "Node {} has a NaN threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ForecastError::ValidationError(format!(
                                "Node {} has invalid child index {}",
                                idx, child
                            )));
                        }
                    }
                }
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(ForecastError::ValidationError(format!(
                            "Leaf {} has a non-finite value",
                            idx
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk the tree for one row and return the leaf value
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { leaf }) => return Ok(*leaf),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                }) => {
                    let value = row.get(*feature).copied().ok_or_else(|| {
                        ForecastError::PredictionError(format!(
                            "Row has {} values, tree needs feature {}",
                            row.len(),
                            feature
                        ))
                    })?;
                    let go_left = if value.is_nan() {
                        *missing_left
                    } else {
                        value < *threshold
                    };
                    let next = if go_left { *left } else { *right };
                    if next <= idx {
                        return Err(ForecastError::PredictionError(format!(
                            "Tree node {} points backwards to {}",
                            idx, next
                        )));
                    }
                    idx = next;
                }
                None => {
                    return Err(ForecastError::PredictionError(format!(
                        "Tree node {} does not exist",
                        idx
                    )))
                }
            }
        }
    }
}

/// Additive ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostedTrees {
    pub fn new(base_score: f64, learning_rate: f64, trees: Vec<RegressionTree>) -> Self {
        Self {
            base_score,
            learning_rate,
            trees,
        }
    }

    /// Parse a model from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every tree against the feature count
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if !self.base_score.is_finite() || !self.learning_rate.is_finite() {
            return Err(ForecastError::ValidationError(
                "base_score and learning_rate must be finite".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ForecastError::ValidationError(
                "Model contains no trees".to_string(),
            ));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features).map_err(|e| {
                ForecastError::ValidationError(format!("Tree {}: {}", idx, e))
            })?;
        }
        Ok(())
    }

    /// Highest feature index used by any split, plus one
    pub fn required_features(&self) -> usize {
        self.trees
            .iter()
            .flat_map(|tree| tree.nodes.iter())
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(feature + 1),
                Node::Leaf { .. } => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl Regressor for GradientBoostedTrees {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(self.base_score + self.learning_rate * sum)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.required_features())
    }

    fn name(&self) -> &str {
        "gradient boosted trees"
    }
}
