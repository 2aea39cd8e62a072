//! Combines the predicted label and its confidence with configurable thresholds;
//! produces a verdict.

use crate::config::AlertConfig;
use crate::pipeline::Classification;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Benign,
    /// Attack label below the confidence floor
    Suspicious,
    Attack,
}

pub struct AlertPolicy {
    config: AlertConfig,
}

impl AlertPolicy {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn verdict(&self, label: &str, confidence: f32) -> Verdict {
        if label == self.config.benign_label {
            Verdict::Benign
        } else if confidence >= self.config.min_confidence {
            Verdict::Attack
        } else {
            Verdict::Suspicious
        }
    }

    pub fn is_high_volume(&self, packets: u64) -> bool {
        packets > self.config.high_volume_packets
    }

    /// Emit one log event for a classified flow and return its verdict
    pub fn report(&self, c: &Classification) -> Verdict {
        let verdict = self.verdict(&c.label, c.confidence);
        let high_volume = self.is_high_volume(c.packets);
        match verdict {
            Verdict::Benign => debug!(
                src_ip = %c.src_ip,
                dst_ip = %c.dst_ip,
                packets = c.packets,
                high_volume,
                "benign flow"
            ),
            Verdict::Suspicious => info!(
                label = %c.label,
                confidence = c.confidence,
                src_ip = %c.src_ip,
                dst_ip = %c.dst_ip,
                packets = c.packets,
                high_volume,
                "low-confidence attack classification"
            ),
            Verdict::Attack => warn!(
                label = %c.label,
                confidence = c.confidence,
                src_ip = %c.src_ip,
                dst_ip = %c.dst_ip,
                packets = c.packets,
                high_volume,
                "attack detected"
            ),
        }
        verdict
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        let policy = AlertPolicy::new(AlertConfig::default());
        assert_eq!(policy.verdict("Normal Traffic", 0.2), Verdict::Benign);
        assert_eq!(policy.verdict("Normal Traffic", 0.99), Verdict::Benign);
        assert_eq!(policy.verdict("DDoS", 0.3), Verdict::Suspicious);
        assert_eq!(policy.verdict("DDoS", 0.5), Verdict::Attack);
    }

    #[test]
    fn high_volume_is_strictly_above_limit() {
        let policy = AlertPolicy::new(AlertConfig::default());
        assert!(!policy.is_high_volume(1000));
        assert!(policy.is_high_volume(1001));
    }
}
