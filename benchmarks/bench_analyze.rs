use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use quakelog::{analyze, parse_segment, segment, NullDiagnostics};

const SAMPLE_LOG: &str = include_str!("../tests/data/qgames.log");

fn large_log() -> String {
    SAMPLE_LOG.repeat(200)
}

fn bench_segment(c: &mut Criterion) {
    let log = large_log();
    c.bench_function("segment_600_matches", |b| {
        b.iter(|| {
            black_box(segment(Cursor::new(black_box(log.as_bytes()))).unwrap());
        });
    });
}

fn bench_parse_segment(c: &mut Criterion) {
    let segments = segment(Cursor::new(SAMPLE_LOG.as_bytes())).unwrap();
    let busiest = segments
        .iter()
        .max_by_key(|s| s.len())
        .expect("sample log has segments");
    c.bench_function("parse_segment", |b| {
        b.iter(|| {
            black_box(parse_segment(black_box(busiest.lines()), 1));
        });
    });
}

fn bench_analyze_workers(c: &mut Criterion) {
    let segments = segment(Cursor::new(large_log().as_bytes())).unwrap();
    let mut group = c.benchmark_group("analyze");
    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                black_box(analyze(segments.clone(), workers, &NullDiagnostics).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_segment, bench_parse_segment, bench_analyze_workers);
criterion_main!(benches);
