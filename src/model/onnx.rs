//! ONNX Runtime classifier. Input: [1, n_features] f32, output: [1, n_classes] class probabilities.
//!
//! Scikit-learn models must be exported without the zipmap stage so the
//! probabilities come back as a plain tensor.

use super::{ArtifactError, Classifier, InferenceError};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;

pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    /// Load the model. Reads `probabilities_output` if the graph has it, else its last output.
    pub fn load(path: &Path, probabilities_output: &str) -> Result<Self, ArtifactError> {
        let onnx_err = |e: &dyn std::fmt::Display| ArtifactError::Onnx {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        if !path.exists() {
            return Err(onnx_err(&"file not found"));
        }

        let session = Session::builder()
            .map_err(|e| onnx_err(&e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| onnx_err(&e))?
            .commit_from_file(path)
            .map_err(|e| onnx_err(&e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| onnx_err(&"model declares no inputs"))?;
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == probabilities_output)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| onnx_err(&"model declares no outputs"))?;

        tracing::info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "ONNX classifier loaded"
        );
        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&mut self, row: &[f32]) -> Result<Vec<f32>, InferenceError> {
        let arr = Array2::from_shape_vec((1, row.len()), row.to_vec())
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        let input = Tensor::from_array(arr).map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        let out = outputs
            .get(self.output_name.as_str())
            .ok_or(InferenceError::EmptyOutput)?;
        let (_shape, probs) = out
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;
        if probs.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        Ok(probs.to_vec())
    }
}
