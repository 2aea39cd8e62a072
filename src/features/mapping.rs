//! Training-schema column → capture-engine attribute.
//!
//! Built once, read-only afterwards. Columns absent from the table are fed as 0.

use crate::flow::FlowAttribute;
use std::collections::HashMap;
use std::sync::OnceLock;

use FlowAttribute::*;

const MAPPINGS: &[(&str, FlowAttribute)] = &[
    // Basic flow info
    ("Destination Port", DstPort),
    ("Flow Duration", BidirectionalDurationMs),
    // Forward packets
    ("Total Fwd Packets", Src2dstPackets),
    ("Total Length of Fwd Packets", Src2dstBytes),
    ("Fwd Packet Length Max", Src2dstMaxPs),
    ("Fwd Packet Length Min", Src2dstMinPs),
    ("Fwd Packet Length Mean", Src2dstMeanPs),
    ("Fwd Packet Length Std", Src2dstStddevPs),
    // Backward packets
    ("Bwd Packet Length Max", Dst2srcMaxPs),
    ("Bwd Packet Length Min", Dst2srcMinPs),
    ("Bwd Packet Length Mean", Dst2srcMeanPs),
    ("Bwd Packet Length Std", Dst2srcStddevPs),
    // Flow "rates" are absolute counts; see DESIGN.md
    ("Flow Bytes/s", BidirectionalBytes),
    ("Flow Packets/s", BidirectionalPackets),
    // Flow IAT
    ("Flow IAT Mean", BidirectionalMeanPiatMs),
    ("Flow IAT Std", BidirectionalStddevPiatMs),
    ("Flow IAT Max", BidirectionalMaxPiatMs),
    ("Flow IAT Min", BidirectionalMinPiatMs),
    // Forward IAT
    ("Fwd IAT Total", Src2dstDurationMs),
    ("Fwd IAT Mean", Src2dstMeanPiatMs),
    ("Fwd IAT Std", Src2dstStddevPiatMs),
    ("Fwd IAT Max", Src2dstMaxPiatMs),
    ("Fwd IAT Min", Src2dstMinPiatMs),
    // Backward IAT
    ("Bwd IAT Total", Dst2srcDurationMs),
    ("Bwd IAT Mean", Dst2srcMeanPiatMs),
    ("Bwd IAT Std", Dst2srcStddevPiatMs),
    ("Bwd IAT Max", Dst2srcMaxPiatMs),
    ("Bwd IAT Min", Dst2srcMinPiatMs),
    // Headers
    ("Fwd Header Length", Src2dstHeaderSize),
    ("Bwd Header Length", Dst2srcHeaderSize),
    ("Fwd Packets/s", Src2dstPackets),
    ("Bwd Packets/s", Dst2srcPackets),
    // Packet stats
    ("Min Packet Length", BidirectionalMinPs),
    ("Max Packet Length", BidirectionalMaxPs),
    ("Packet Length Mean", BidirectionalMeanPs),
    ("Packet Length Std", BidirectionalStddevPs),
    ("Packet Length Variance", BidirectionalStddevPs),
    // Flags
    ("FIN Flag Count", BidirectionalFinPackets),
    ("PSH Flag Count", BidirectionalPshPackets),
    ("ACK Flag Count", BidirectionalAckPackets),
    // Others
    ("Average Packet Size", BidirectionalMeanPs),
    ("Subflow Fwd Bytes", Src2dstBytes),
    ("Init_Win_bytes_forward", Src2dstInitWindowSize),
    ("Init_Win_bytes_backward", Dst2srcInitWindowSize),
    ("act_data_pkt_fwd", Src2dstPackets),
    ("min_seg_size_forward", Src2dstMinPs),
];

static TABLE: OnceLock<HashMap<&'static str, FlowAttribute>> = OnceLock::new();

/// The process-wide mapping table
pub fn mapping_table() -> &'static HashMap<&'static str, FlowAttribute> {
    TABLE.get_or_init(|| MAPPINGS.iter().copied().collect())
}

/// Source attribute feeding `column`, if the column is mapped
pub fn source_attribute(column: &str) -> Option<FlowAttribute> {
    mapping_table().get(column).copied()
}
