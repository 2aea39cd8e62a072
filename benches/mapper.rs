//! Feature mapping benchmark: one flow → classifier-schema vector.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nids_agent::features::{mapping_table, FeatureMapper, FeatureSchema};
use nids_agent::flow::{FlowAttribute, FlowRecord};

fn full_flow() -> FlowRecord {
    FlowAttribute::ALL
        .iter()
        .enumerate()
        .fold(FlowRecord::new("10.0.0.1", "10.0.0.2"), |f, (i, a)| f.with(*a, i as f64 + 0.5))
}

fn bench_map_mapped_columns(c: &mut Criterion) {
    let mut columns: Vec<&str> = mapping_table().keys().copied().collect();
    columns.sort_unstable();
    let mapper = FeatureMapper::new(FeatureSchema::new(columns, "Attack Type"));
    let flow = full_flow();

    c.bench_function("map_all_mapped_columns", |b| b.iter(|| mapper.map(black_box(&flow))));
}

fn bench_map_by_schema_width(c: &mut Criterion) {
    let flow = full_flow();
    let mut g = c.benchmark_group("map_by_width");
    for width in [16, 52, 78] {
        let columns: Vec<String> = (0..width).map(|i| format!("Column {}", i)).collect();
        let mapper = FeatureMapper::new(FeatureSchema::new(columns, "Attack Type"));
        g.bench_function(format!("width_{}", width).as_str(), |b| {
            b.iter(|| mapper.map(black_box(&flow)))
        });
    }
    g.finish();
}

criterion_group!(benches, bench_map_mapped_columns, bench_map_by_schema_width);
criterion_main!(benches);
