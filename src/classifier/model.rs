//! Logistic regression over readability features
//!
//! Models are plain JSON so they can be exported from any training setup:
//!
//! ```json
//! {
//!   "feature_names": ["BW AVG commas", "Posnett volume"],
//!   "coefficients": [-0.8, -0.002],
//!   "intercept": 1.3,
//!   "means": [0.1, 250.0],
//!   "scales": [0.05, 120.0],
//!   "cutoff": 0.5
//! }
//! ```
//!
//! `means` and `scales` are optional standardization parameters applied to
//! each value before the linear term.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prediction result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// 1 for readable, 0 otherwise
    pub label: u8,
    /// Probability of the readable class
    pub probability: f64,
}

/// A trained readability classifier
pub trait ReadabilityModel: Send + Sync {
    /// Features the model expects, in input order
    fn feature_names(&self) -> &[String];

    fn predict(&self, values: &[f64]) -> Result<Prediction, ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    means: Option<Vec<f64>>,
    #[serde(default)]
    scales: Option<Vec<f64>>,
    #[serde(default = "default_cutoff")]
    cutoff: f64,
}

fn default_cutoff() -> f64 {
    0.5
}

impl LogisticModel {
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
            means: None,
            scales: None,
            cutoff: default_cutoff(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_standardization(mut self, means: Vec<f64>, scales: Vec<f64>) -> Result<Self, ModelError> {
        self.means = Some(means);
        self.scales = Some(scales);
        self.validate()?;
        Ok(self)
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Load pre-trained model from JSON
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Save model to JSON
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn validate(&self) -> Result<(), ModelError> {
        let expected = self.feature_names.len();
        if self.coefficients.len() != expected {
            return Err(ModelError::Inconsistent {
                names: expected,
                coefficients: self.coefficients.len(),
            });
        }
        for (field, values) in [("means", &self.means), ("scales", &self.scales)] {
            if let Some(values) = values {
                if values.len() != expected {
                    return Err(ModelError::Scaling {
                        field,
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Standardized value of feature `i`; a zero scale leaves the value unscaled
    fn standardize(&self, i: usize, value: f64) -> f64 {
        let mean = self.means.as_ref().map_or(0.0, |m| m[i]);
        let scale = self
            .scales
            .as_ref()
            .map(|s| s[i])
            .filter(|&s| s != 0.0)
            .unwrap_or(1.0);
        (value - mean) / scale
    }
}

impl ReadabilityModel for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, values: &[f64]) -> Result<Prediction, ModelError> {
        if values.len() != self.coefficients.len() {
            return Err(ModelError::FeatureCount {
                expected: self.coefficients.len(),
                actual: values.len(),
            });
        }

        let logit = self.intercept
            + values
                .iter()
                .zip(&self.coefficients)
                .enumerate()
                .map(|(i, (&x, &w))| w * self.standardize(i, x))
                .sum::<f64>();
        let probability = 1.0 / (1.0 + (-logit).exp());

        Ok(Prediction {
            label: u8::from(probability >= self.cutoff),
            probability,
        })
    }
}
