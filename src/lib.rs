//! NIDS Agent — real-time network intrusion detection over captured flow records.
//!
//! Modular structure:
//! - [`flow`] — Flow records from the capture engine and their typed attributes
//! - [`features`] — Mapping of flow attributes onto the classifier's training schema
//! - [`model`] — Scaler, label encoder and ONNX classifier inference
//! - [`storage`] — Append-only SQLite classification log
//! - [`alert`] — Verdicts and operator-facing reporting
//! - [`pipeline`] — The per-flow stream loop
//! - [`logging`] — Structured logging setup

pub mod config;
pub mod flow;
pub mod features;
pub mod model;
pub mod storage;
pub mod alert;
pub mod pipeline;
pub mod logging;

pub use config::AgentConfig;
pub use flow::{FlowAttribute, FlowRecord};
pub use features::{FeatureMapper, FeatureSchema, FeatureVector};
pub use model::{Classifier, InferenceAdapter, OnnxClassifier};
pub use storage::{LogEntry, LogSink};
pub use alert::AlertPolicy;
pub use pipeline::{PipelineStats, StreamLoop};
pub use logging::StructuredLogger;
