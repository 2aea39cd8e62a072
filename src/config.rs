//! Agent configuration. Store location, flow input, model artifacts, alerting and logging.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Directory holding the classification log store
    pub data_dir: PathBuf,
    /// Store file name inside `data_dir`
    pub store_file: String,
    /// Where finalized flow records are read from
    pub source: SourceConfig,
    /// Classifier and its training-time artifacts
    pub model: ModelConfig,
    /// How classifications are reported to the operator
    pub alert: AlertConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// NDJSON flow records; `-` reads stdin, anything else is a file or named pipe
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing all artifacts below
    pub dir: PathBuf,
    pub classifier_file: String,
    pub scaler_file: String,
    pub encoder_file: String,
    pub features_file: String,
    /// Name of the class-probability output of the ONNX graph
    pub probabilities_output: String,
    /// Training target column; never fed to the classifier
    pub label_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Label the classifier uses for normal traffic
    pub benign_label: String,
    /// Attacks below this confidence are reported at info instead of warn (0.0–1.0)
    pub min_confidence: f32,
    /// Flows above this many packets are flagged as high volume
    pub high_volume_packets: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".nids"),
            store_file: "nids.db".to_string(),
            source: SourceConfig::default(),
            model: ModelConfig::default(),
            alert: AlertConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "-".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("model"),
            classifier_file: "nids_model.onnx".to_string(),
            scaler_file: "scaler.json".to_string(),
            encoder_file: "label_encoder.json".to_string(),
            features_file: "feature_names.json".to_string(),
            probabilities_output: "probabilities".to_string(),
            label_column: "Attack Type".to_string(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            benign_label: "Normal Traffic".to_string(),
            min_confidence: 0.5,
            high_volume_packets: 1000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ModelConfig {
    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(&self.encoder_file)
    }

    pub fn features_path(&self) -> PathBuf {
        self.dir.join(&self.features_file)
    }
}

impl AgentConfig {
    /// Load from JSON file if present; otherwise return default.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full path of the classification log store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }

    /// Default config location: `$NIDS_CONFIG_PATH`, then `config.json` in the
    /// working directory, then the per-user config directory.
    pub fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var("NIDS_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        let local = PathBuf::from("config.json");
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|d| d.join("nids-agent").join("config.json"))
            .unwrap_or(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let body = r#"{"store_file": "flows.db", "alert": {"min_confidence": 0.9}}"#;
        std::fs::write(&path, body).unwrap();

        let c = AgentConfig::load(&path).unwrap();
        assert_eq!(c.store_file, "flows.db");
        assert_eq!(c.alert.min_confidence, 0.9);
        assert_eq!(c.alert.benign_label, "Normal Traffic");
        assert_eq!(c.model.label_column, "Attack Type");
        assert_eq!(c.source.path, "-");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(AgentConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn artifact_paths_join_model_dir() {
        let c = AgentConfig::default();
        assert_eq!(c.model.classifier_path(), PathBuf::from("model/nids_model.onnx"));
        assert_eq!(c.store_path(), PathBuf::from(".nids/nids.db"));
    }
}
