//! Inference adapter: raw feature vector → scaled row → class probabilities
//! → (label, confidence).

use super::{LabelEncoder, StandardScaler};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-flow inference failure. The flow is skipped; the agent keeps running.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature vector has {got} values, model expects {expected}")]
    Shape { expected: usize, got: usize },
    #[error("feature `{column}` is not a finite number")]
    NonFinite { column: String },
    #[error("classifier failed: {0}")]
    Runtime(String),
    #[error("classifier returned no usable probabilities")]
    EmptyOutput,
    #[error("class index {index} outside label encoder ({classes} classes)")]
    UnknownClass { index: usize, classes: usize },
}

/// Anything that turns one scaled feature row into class probabilities
pub trait Classifier {
    fn predict_proba(&mut self, row: &[f32]) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Probability of `label`, in [0, 1]
    pub confidence: f32,
    pub class_index: usize,
}

pub struct InferenceAdapter {
    scaler: StandardScaler,
    encoder: LabelEncoder,
    classifier: Box<dyn Classifier>,
}

impl InferenceAdapter {
    pub fn new(
        scaler: StandardScaler,
        encoder: LabelEncoder,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            scaler,
            encoder,
            classifier,
        }
    }

    pub fn predict(&mut self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        if let Some((column, _)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFinite {
                column: column.to_string(),
            });
        }
        let row = self.scaler.transform(features.as_slice())?;
        // Finite f64 inputs can still overflow f32 once scaled
        if let Some(i) = row.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite {
                column: features.columns()[i].clone(),
            });
        }
        let probs = self.classifier.predict_proba(&row)?;
        let (index, p) = argmax(&probs).ok_or(InferenceError::EmptyOutput)?;
        let label = self.encoder.label(index).ok_or(InferenceError::UnknownClass {
            index,
            classes: self.encoder.len(),
        })?;
        Ok(Prediction {
            label: label.to_string(),
            confidence: p.clamp(0.0, 1.0),
            class_index: index,
        })
    }
}

/// First index of the largest finite probability
fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, p)| p.is_finite())
        .fold(None, |best, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
}
