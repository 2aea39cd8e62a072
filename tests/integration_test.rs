//! Integration test: config load, flow decode, feature mapping, inference with a stub
//! model, logging.

use nids_agent::{
    alert::AlertPolicy,
    config::{AgentConfig, AlertConfig},
    features::{FeatureMapper, FeatureSchema},
    flow::{FlowAttribute, FlowRecord, JsonLinesSource},
    model::{Classifier, InferenceAdapter, InferenceError, LabelEncoder, StandardScaler},
    pipeline::StreamLoop,
    storage::LogSink,
};
use rusqlite::Connection;
use std::cell::Cell;
use std::io::Cursor;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

const COLUMNS: &[&str] = &[
    "Destination Port",
    "Flow Duration",
    "Total Fwd Packets",
    "Fwd IAT Total",
    "Packet Length Std",
    "Packet Length Variance",
    "Init_Win_bytes_forward",
    "Attack Type",
];

/// Returns fixed probabilities, or fails on the calls listed in `fail_on` (0-based)
struct Scripted {
    calls: Rc<Cell<usize>>,
    fail_on: Vec<usize>,
}

impl Classifier for Scripted {
    fn predict_proba(&mut self, _row: &[f32]) -> Result<Vec<f32>, InferenceError> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if self.fail_on.contains(&n) {
            return Err(InferenceError::Runtime("injected failure".into()));
        }
        Ok(vec![0.1, 0.85, 0.05])
    }
}

fn schema() -> FeatureSchema {
    FeatureSchema::new(COLUMNS.iter().copied(), "Attack Type")
}

fn build_loop(store: &Path, fail_on: Vec<usize>) -> (StreamLoop, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let n = schema().len();
    let adapter = InferenceAdapter::new(
        StandardScaler::new(vec![0.0; n], vec![1.0; n]),
        LabelEncoder::new(["Normal Traffic", "DoS", "Port Scanning"]),
        Box::new(Scripted {
            calls: calls.clone(),
            fail_on,
        }),
    );
    let sl = StreamLoop::new(
        FeatureMapper::new(schema()),
        adapter,
        LogSink::new(store),
        AlertPolicy::new(AlertConfig::default()),
    );
    (sl, calls)
}

fn logged_rows(store: &Path) -> Vec<(String, String, String, f64)> {
    let conn = Connection::open(store).unwrap();
    let mut stmt = conn
        .prepare("SELECT src_ip, dst_ip, attack_type, confidence FROM logs ORDER BY id")
        .unwrap();
    let rows: Vec<(String, String, String, f64)> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
        .unwrap()
        .map(Result::unwrap)
        .collect();
    rows
}

#[test]
fn config_load_default() {
    let c = AgentConfig::load(Path::new("nonexistent.json")).unwrap();
    assert_eq!(c.model.label_column, "Attack Type");
    assert_eq!(c.alert.benign_label, "Normal Traffic");
    assert_eq!(c.source.path, "-");
}

#[test]
fn mapper_scenarios() {
    let mapper = FeatureMapper::new(schema());
    let flow = FlowRecord::new("10.1.1.1", "10.1.1.2")
        .with(FlowAttribute::BidirectionalStddevPs, 4.0)
        .with(FlowAttribute::Src2dstDurationMs, 0.002)
        .with(FlowAttribute::BidirectionalDurationMs, 0.5);
    let fv = mapper.map(&flow);

    assert_eq!(fv.len(), COLUMNS.len() - 1);
    assert_eq!(fv.columns(), &COLUMNS[..COLUMNS.len() - 1]);
    assert_eq!(fv.get("Packet Length Variance"), Some(16.0));
    assert_eq!(fv.get("Packet Length Std"), Some(4.0));
    assert!((fv.get("Fwd IAT Total").unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(fv.get("Flow Duration"), Some(500.0));
    assert_eq!(fv.get("Init_Win_bytes_forward"), Some(0.0));
    assert_eq!(fv.get("Attack Type"), None);
}

#[test]
fn flow_missing_attributes_still_logged() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("nids.db");
    let (mut sl, _) = build_loop(&store, vec![]);

    let input = r#"{"src_ip":"192.168.0.10","dst_ip":"192.168.0.1"}"#;
    sl.run(JsonLinesSource::new(Cursor::new(input)), &AtomicBool::new(false))
        .unwrap();

    let rows = logged_rows(&store);
    assert_eq!(rows.len(), 1);
    let (src, dst, label, conf) = &rows[0];
    assert_eq!(
        (src.as_str(), dst.as_str(), label.as_str()),
        ("192.168.0.10", "192.168.0.1", "DoS")
    );
    assert!((conf - 0.85).abs() < 1e-6);
    assert_eq!(sl.stats().attacks, 1);
}

#[test]
fn failed_prediction_skips_only_that_flow() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("nids.db");
    let (mut sl, calls) = build_loop(&store, vec![1]);

    let input = [
        r#"{"src_ip":"10.0.0.1","dst_ip":"10.0.0.9","dst_port":80}"#,
        r#"{"src_ip":"10.0.0.2","dst_ip":"10.0.0.9","dst_port":81}"#,
        r#"{"src_ip":"10.0.0.3","dst_ip":"10.0.0.9","dst_port":82}"#,
    ]
    .join("\n");
    sl.run(JsonLinesSource::new(Cursor::new(input)), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(calls.get(), 3);
    let srcs: Vec<String> = logged_rows(&store).into_iter().map(|r| r.0).collect();
    assert_eq!(srcs, ["10.0.0.1", "10.0.0.3"]);
    assert_eq!(sl.stats().skipped, 1);
    assert_eq!(sl.stats().logged, 2);
}

#[test]
fn undecodable_line_does_not_stop_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("nids.db");
    let (mut sl, _) = build_loop(&store, vec![]);

    let input = concat!(
        "{\"src_ip\":\"a\",\"dst_ip\":\"b\"}\n",
        "{broken\n",
        "{\"src_ip\":\"c\",\"dst_ip\":\"d\"}\n",
    );
    sl.run(JsonLinesSource::new(Cursor::new(input)), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(logged_rows(&store).len(), 2);
    assert_eq!(sl.stats().seen, 3);
    assert_eq!(sl.stats().skipped, 1);
}

#[test]
fn unwritable_store_does_not_stop_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"").unwrap();
    let (mut sl, calls) = build_loop(&blocker.join("nids.db"), vec![]);

    let input = "{\"src_ip\":\"a\",\"dst_ip\":\"b\"}\n{\"src_ip\":\"c\",\"dst_ip\":\"d\"}\n";
    sl.run(JsonLinesSource::new(Cursor::new(input)), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(calls.get(), 2);
    assert_eq!(sl.stats().classified, 2);
    assert_eq!(sl.stats().logged, 0);
    assert_eq!(sl.stats().store_failures, 2);
}

#[test]
fn invalid_utf8_line_does_not_stop_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("nids.db");
    let (mut sl, _) = build_loop(&store, vec![]);

    let mut input = b"{\"src_ip\":\"10.0.0.1\",\"dst_ip\":\"10.0.0.9\"}\n".to_vec();
    input.extend_from_slice(b"{\"src_ip\":\"\xff\xfe\",\"dst_ip\":\"10.0.0.9\"}\n");
    input.extend_from_slice(b"{\"src_ip\":\"10.0.0.3\",\"dst_ip\":\"10.0.0.9\"}\n");
    sl.run(JsonLinesSource::new(Cursor::new(input)), &AtomicBool::new(false))
        .unwrap();

    assert_eq!(sl.stats().classified, 2);
    assert_eq!(sl.stats().skipped, 1);
    let srcs: Vec<String> = logged_rows(&store).into_iter().map(|r| r.0).collect();
    assert_eq!(srcs, ["10.0.0.1", "10.0.0.3"]);
}
