//! Stream loop: flow source → feature mapper → inference adapter → log sink.
//!
//! One flow at a time, in arrival order, at most once. A flow that cannot be
//! decoded or scored is skipped; only a failing source ends the loop early.

use crate::alert::{AlertPolicy, Verdict};
use crate::features::FeatureMapper;
use crate::flow::{FlowRecord, SourceError};
use crate::model::{InferenceAdapter, InferenceError};
use crate::storage::{LogEntry, LogSink};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    /// Fatal errors end the loop; everything else costs one flow
    pub fn is_fatal(&self) -> bool {
        match self {
            PipelineError::Source(e) => e.is_fatal(),
            PipelineError::Inference(_) => false,
        }
    }
}

/// Outcome for one flow, kept only until it is logged and reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub src_ip: String,
    pub dst_ip: String,
    pub label: String,
    pub confidence: f32,
    pub packets: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Records received, decodable or not
    pub seen: u64,
    pub classified: u64,
    /// Decode or inference failures
    pub skipped: u64,
    pub logged: u64,
    pub store_failures: u64,
    pub attacks: u64,
    pub suspicious: u64,
}

pub struct StreamLoop {
    mapper: FeatureMapper,
    adapter: InferenceAdapter,
    sink: LogSink,
    alerts: AlertPolicy,
    stats: PipelineStats,
}

impl StreamLoop {
    pub fn new(
        mapper: FeatureMapper,
        adapter: InferenceAdapter,
        sink: LogSink,
        alerts: AlertPolicy,
    ) -> Self {
        Self {
            mapper,
            adapter,
            sink,
            alerts,
            stats: PipelineStats::default(),
        }
    }

    /// Map, score and log one flow. The store is only written once scoring succeeded.
    pub fn process(&mut self, flow: &FlowRecord) -> Result<Classification, PipelineError> {
        let features = self.mapper.map(flow);
        let prediction = self.adapter.predict(&features)?;

        let entry = LogEntry::now(
            &flow.src_ip,
            &flow.dst_ip,
            &prediction.label,
            prediction.confidence,
        );
        if self.sink.append(&entry) {
            self.stats.logged += 1;
        }
        self.stats.store_failures = self.sink.failures();

        Ok(Classification {
            src_ip: flow.src_ip.clone(),
            dst_ip: flow.dst_ip.clone(),
            label: prediction.label,
            confidence: prediction.confidence,
            packets: flow.total_packets(),
        })
    }

    /// Drain `source` until it ends, fails, or `stop` is raised.
    pub fn run<I>(&mut self, source: I, stop: &AtomicBool) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Result<FlowRecord, SourceError>>,
    {
        for item in source {
            let outcome = item
                .map_err(PipelineError::from)
                .and_then(|flow| self.process(&flow));

            match outcome {
                Ok(c) => {
                    self.stats.seen += 1;
                    self.stats.classified += 1;
                    match self.alerts.report(&c) {
                        Verdict::Attack => self.stats.attacks += 1,
                        Verdict::Suspicious => self.stats.suspicious += 1,
                        Verdict::Benign => {}
                    }
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "flow source failed; stopping");
                    return Err(e);
                }
                Err(e) => {
                    self.stats.seen += 1;
                    self.stats.skipped += 1;
                    warn!(error = %e, skipped = self.stats.skipped, "flow skipped");
                }
            }

            if stop.load(Ordering::Relaxed) {
                info!("stop requested");
                break;
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }
}
