//! Benchmarks for prefix-finder
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prefix_finder::walker::partition::{
    parse_prefix_keys, partition, CandidateEntry, DEFAULT_PREFIX_KEYS,
};
use std::path::PathBuf;

fn benchmark_partition(c: &mut Criterion) {
    let keys = parse_prefix_keys(DEFAULT_PREFIX_KEYS);
    let children: Vec<CandidateEntry> = (0..10_000)
        .map(|i| CandidateEntry::new(PathBuf::from(format!("/mnt/share/{}_dir_{i}", (b'a' + (i % 26) as u8) as char))))
        .collect();

    c.bench_function("partition_10k_default_keys", |b| {
        b.iter(|| {
            let map = partition(black_box(&children), black_box(&keys));
            black_box(map);
        })
    });
}

fn benchmark_parse_keys(c: &mut Criterion) {
    c.bench_function("parse_default_keys", |b| {
        b.iter(|| black_box(parse_prefix_keys(black_box(DEFAULT_PREFIX_KEYS))))
    });
}

criterion_group!(benches, benchmark_partition, benchmark_parse_keys);
criterion_main!(benches);
