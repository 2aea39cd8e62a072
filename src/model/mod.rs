//! Classifier inference: training-time scaler and label encoder around an ONNX model.
//!
//! Every artifact is loaded once at startup and never modified; a missing or
//! malformed artifact is an [`ArtifactError`] and the agent refuses to start.

mod adapter;
mod encoder;
mod onnx;
mod scaler;

pub use adapter::{Classifier, InferenceAdapter, InferenceError, Prediction};
pub use encoder::LabelEncoder;
pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;

use crate::config::ModelConfig;
use crate::features::FeatureSchema;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot load ONNX model {path}: {message}")]
    Onnx { path: PathBuf, message: String },
    #[error("inconsistent model artifacts: {0}")]
    Invalid(String),
}

/// The JSON artifacts fitted alongside the classifier
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub encoder: LabelEncoder,
}

impl Artifacts {
    pub fn load(config: &ModelConfig) -> Result<Self, ArtifactError> {
        let names: Vec<String> = read_json(&config.features_path())?;
        let schema = FeatureSchema::new(names, &config.label_column);
        let scaler: StandardScaler = read_json(&config.scaler_path())?;
        let encoder: LabelEncoder = read_json(&config.encoder_path())?;
        Self::new(schema, scaler, encoder)
    }

    /// Check the artifacts agree with each other
    pub fn new(
        schema: FeatureSchema,
        scaler: StandardScaler,
        encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        if schema.is_empty() {
            return Err(ArtifactError::Invalid("feature schema has no input columns".into()));
        }
        scaler.validate().map_err(ArtifactError::Invalid)?;
        if scaler.len() != schema.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler fitted on {} features, schema has {}",
                scaler.len(),
                schema.len()
            )));
        }
        if encoder.is_empty() {
            return Err(ArtifactError::Invalid("label encoder has no classes".into()));
        }
        Ok(Self {
            schema,
            scaler,
            encoder,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
