//! NIDS agent entrypoint: load the model artifacts, then classify flow records until the
//! capture engine stops sending them (Ctrl+C stops after the current flow; twice exits at once).

use anyhow::Context;
use nids_agent::{
    alert::AlertPolicy,
    config::AgentConfig,
    features::FeatureMapper,
    flow::open_source,
    logging::StructuredLogger,
    model::{Artifacts, InferenceAdapter, OnnxClassifier},
    pipeline::StreamLoop,
    storage::LogSink,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

static STOP: AtomicBool = AtomicBool::new(false);

fn main() -> anyhow::Result<()> {
    let config_path = AgentConfig::default_path();
    let config = AgentConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(config = %config_path.display(), "NIDS agent starting");

    let artifacts = Artifacts::load(&config.model).context("loading model artifacts")?;
    let classifier = OnnxClassifier::load(
        &config.model.classifier_path(),
        &config.model.probabilities_output,
    )
    .context("loading classifier")?;
    info!(
        features = artifacts.schema.len(),
        classes = artifacts.encoder.len(),
        "model assets loaded"
    );

    let mapper = FeatureMapper::new(artifacts.schema);
    let unmapped: Vec<&str> = mapper.unmapped_columns().collect();
    if !unmapped.is_empty() {
        warn!(columns = ?unmapped, "schema columns without a flow attribute are fed as 0");
    }

    let adapter = InferenceAdapter::new(artifacts.scaler, artifacts.encoder, Box::new(classifier));
    let mut sink = LogSink::new(config.store_path());
    if let Err(e) = sink.open() {
        warn!(
            path = %config.store_path().display(),
            error = %e,
            "log store unavailable; retrying on first write"
        );
    }
    let alerts = AlertPolicy::new(config.alert.clone());
    let mut stream = StreamLoop::new(mapper, adapter, sink, alerts);

    let _ = ctrlc::set_handler(|| {
        if STOP.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
    });

    let source = open_source(&config.source.path)
        .with_context(|| format!("opening flow source {}", config.source.path))?;
    info!(source = %config.source.path, "NIDS engine is live");

    let result = stream.run(source, &STOP);

    let stats = stream.stats();
    info!(
        seen = stats.seen,
        classified = stats.classified,
        skipped = stats.skipped,
        logged = stats.logged,
        store_failures = stats.store_failures,
        attacks = stats.attacks,
        suspicious = stats.suspicious,
        "NIDS agent stopping"
    );
    result.map_err(Into::into)
}
