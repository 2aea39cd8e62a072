//! Standard scaler with parameters captured at training time: `(x - mean) / scale`.

use super::InferenceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Number of features the scaler was fitted on
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("scaler parameters contain non-finite values".into());
        }
        Ok(())
    }

    /// Scale one raw row. A zero scale (constant training column) divides by 1.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f32>, InferenceError> {
        if row.len() != self.len() {
            return Err(InferenceError::Shape {
                expected: self.len(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                ((x - m) / s) as f32
            })
            .collect())
    }
}
