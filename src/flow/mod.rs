//! Flow records as emitted by the capture engine, and typed access to their attributes.
//!
//! Attribute names follow the capture engine's naming (`src2dst_packets`,
//! `bidirectional_stddev_ps`, ...). Every attribute the feature mapping can
//! reference is a [`FlowAttribute`] variant; anything the engine did not
//! report reads as 0.

mod source;

pub use source::{open_source, JsonLinesSource, SourceError};

use serde::{Deserialize, Serialize};

macro_rules! flow_attributes {
    ($($variant:ident => $field:ident),+ $(,)?) => {
        /// Source attribute of a flow record
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FlowAttribute {
            $($variant),+
        }

        impl FlowAttribute {
            pub const ALL: &'static [FlowAttribute] = &[$(FlowAttribute::$variant),+];

            /// Attribute name as the capture engine spells it
            pub fn name(self) -> &'static str {
                match self {
                    $(FlowAttribute::$variant => stringify!($field)),+
                }
            }
        }

        /// Numeric flow statistics. `None` means the engine did not report it.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct FlowStats {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<f64>,
            )+
        }

        impl FlowStats {
            pub fn get(&self, attr: FlowAttribute) -> Option<f64> {
                match attr {
                    $(FlowAttribute::$variant => self.$field),+
                }
            }

            pub fn set(&mut self, attr: FlowAttribute, value: f64) {
                match attr {
                    $(FlowAttribute::$variant => self.$field = Some(value)),+
                }
            }
        }
    };
}

flow_attributes! {
    DstPort => dst_port,

    BidirectionalDurationMs => bidirectional_duration_ms,
    BidirectionalPackets => bidirectional_packets,
    BidirectionalBytes => bidirectional_bytes,
    Src2dstDurationMs => src2dst_duration_ms,
    Src2dstPackets => src2dst_packets,
    Src2dstBytes => src2dst_bytes,
    Dst2srcDurationMs => dst2src_duration_ms,
    Dst2srcPackets => dst2src_packets,
    Dst2srcBytes => dst2src_bytes,

    BidirectionalMinPs => bidirectional_min_ps,
    BidirectionalMeanPs => bidirectional_mean_ps,
    BidirectionalStddevPs => bidirectional_stddev_ps,
    BidirectionalMaxPs => bidirectional_max_ps,
    Src2dstMinPs => src2dst_min_ps,
    Src2dstMeanPs => src2dst_mean_ps,
    Src2dstStddevPs => src2dst_stddev_ps,
    Src2dstMaxPs => src2dst_max_ps,
    Dst2srcMinPs => dst2src_min_ps,
    Dst2srcMeanPs => dst2src_mean_ps,
    Dst2srcStddevPs => dst2src_stddev_ps,
    Dst2srcMaxPs => dst2src_max_ps,

    BidirectionalMinPiatMs => bidirectional_min_piat_ms,
    BidirectionalMeanPiatMs => bidirectional_mean_piat_ms,
    BidirectionalStddevPiatMs => bidirectional_stddev_piat_ms,
    BidirectionalMaxPiatMs => bidirectional_max_piat_ms,
    Src2dstMinPiatMs => src2dst_min_piat_ms,
    Src2dstMeanPiatMs => src2dst_mean_piat_ms,
    Src2dstStddevPiatMs => src2dst_stddev_piat_ms,
    Src2dstMaxPiatMs => src2dst_max_piat_ms,
    Dst2srcMinPiatMs => dst2src_min_piat_ms,
    Dst2srcMeanPiatMs => dst2src_mean_piat_ms,
    Dst2srcStddevPiatMs => dst2src_stddev_piat_ms,
    Dst2srcMaxPiatMs => dst2src_max_piat_ms,

    BidirectionalSynPackets => bidirectional_syn_packets,
    BidirectionalAckPackets => bidirectional_ack_packets,
    BidirectionalPshPackets => bidirectional_psh_packets,
    BidirectionalRstPackets => bidirectional_rst_packets,
    BidirectionalFinPackets => bidirectional_fin_packets,

    Src2dstHeaderSize => src2dst_header_size,
    Dst2srcHeaderSize => dst2src_header_size,
    Src2dstInitWindowSize => src2dst_init_window_size,
    Dst2srcInitWindowSize => dst2src_init_window_size,
}

impl FlowAttribute {
    /// Resolve an engine attribute name; unknown names resolve to `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }
}

/// One finalized bidirectional flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub dst_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<u8>,
    #[serde(flatten)]
    pub stats: FlowStats,
}

impl FlowRecord {
    pub fn new(src_ip: impl Into<String>, dst_ip: impl Into<String>) -> Self {
        Self {
            src_ip: src_ip.into(),
            dst_ip: dst_ip.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter, mostly for tests and replay tooling
    pub fn with(mut self, attr: FlowAttribute, value: f64) -> Self {
        self.stats.set(attr, value);
        self
    }

    /// Attribute value; 0 when the engine did not report it
    pub fn value(&self, attr: FlowAttribute) -> f64 {
        self.stats.get(attr).unwrap_or(0.0)
    }

    /// Attribute value by engine name; 0 for unknown names and missing values
    pub fn value_by_name(&self, name: &str) -> f64 {
        FlowAttribute::from_name(name)
            .map(|a| self.value(a))
            .unwrap_or(0.0)
    }

    pub fn total_packets(&self) -> u64 {
        self.value(FlowAttribute::BidirectionalPackets).max(0.0) as u64
    }
}
