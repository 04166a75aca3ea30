//! Benchmarks for the row/column adapters

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use indexmap::IndexMap;
use std::hint::black_box;
use stepwrap::{format_elapsed, map_columns, rows_from_columns};
use std::time::Duration;

fn build_columns(keys: usize) -> IndexMap<String, i64> {
    (0..keys).map(|i| (format!("key_{i}"), i as i64)).collect()
}

fn bench_map_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_columns");
    for keys in [10usize, 100, 1000] {
        let input = build_columns(keys);
        group.bench_with_input(BenchmarkId::from_parameter(keys), &input, |b, input| {
            b.iter(|| {
                let out = map_columns(black_box(std::slice::from_ref(input)), |row| {
                    row[0].copied().unwrap_or(0) * 2
                });
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_rows_from_columns(c: &mut Criterion) {
    c.bench_function("rows_from_columns_100x100", |b| {
        b.iter_batched(
            || {
                (0..100usize)
                    .map(|i| (format!("col_{i}"), (0..100i64).collect::<Vec<_>>()))
                    .collect::<IndexMap<_, _>>()
            },
            |columns| black_box(rows_from_columns(columns)),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_format_elapsed(c: &mut Criterion) {
    c.bench_function("format_elapsed", |b| {
        b.iter(|| {
            for secs in [0.4f64, 1.0, 65.0, 3661.0] {
                black_box(format_elapsed(Duration::from_secs_f64(black_box(secs))));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_map_columns,
    bench_rows_from_columns,
    bench_format_elapsed
);
criterion_main!(benches);
