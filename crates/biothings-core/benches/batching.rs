//! Benchmarks for the batching engine
//!
//! Measures:
//! - Partitioning large id lists into batches
//! - Duplicate and missing term tallies over query-many hits
//! - Table construction from hits

use biothings_core::engine::{chunked, join_quoted, tally_hits};
use biothings_core::{DataFrameMode, Table, Terms};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::num::NonZeroUsize;

fn make_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}", 1000 + i)).collect()
}

fn make_hits(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| match i % 10 {
            0 => json!({"query": format!("t{}", i), "notfound": true}),
            1 => json!({"query": format!("t{}", i - 1), "_id": i}),
            _ => json!({
                "query": format!("t{}", i),
                "_id": i,
                "symbol": format!("SYM{}", i),
                "genomic_pos": {"chr": "1", "start": i * 100}
            }),
        })
        .collect()
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    let step = NonZeroUsize::new(1000).unwrap_or(NonZeroUsize::MIN);

    for count in [1_000, 10_000, 100_000] {
        let ids = make_ids(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &ids, |b, ids| {
            b.iter(|| {
                let mut sent = 0;
                for batch in chunked(Terms::lazy(ids.iter().cloned()), step) {
                    sent += join_quoted(&batch.items).len();
                }
                black_box(sent)
            })
        });
    }
    group.finish();
}

fn bench_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally");
    for count in [1_000, 10_000] {
        let hits = make_hits(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &hits, |b, hits| {
            b.iter(|| black_box(tally_hits(hits)))
        });
    }
    group.finish();
}

fn bench_table(c: &mut Criterion) {
    let hits = make_hits(5_000);
    c.bench_function("table_normalize_5000", |b| {
        b.iter(|| black_box(Table::from_hits(&hits, DataFrameMode::Normalize, true)))
    });
}

criterion_group!(benches, bench_partition, bench_tally, bench_table);
criterion_main!(benches);
