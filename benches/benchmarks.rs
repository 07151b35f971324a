use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::num::NonZeroUsize;

use bbp_pi::{compute_pi, PiSettings, PowerMode, Precision, TermCalculator};

/// Benchmark single term evaluation at different precisions
fn bench_term(c: &mut Criterion) {
    let mut group = c.benchmark_group("term");

    for bits in [64u32, 256, 1024, 4096] {
        let calc = TermCalculator::new(Precision::new(bits).unwrap(), PowerMode::Float64);
        group.bench_with_input(BenchmarkId::new("bits", bits), &bits, |b, _| {
            b.iter(|| black_box(calc.term(black_box(137))))
        });
    }

    group.finish();
}

/// Benchmark the full pipeline across worker counts
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let rounds = 2_000u64;
    group.throughput(Throughput::Elements(rounds));

    for workers in [1usize, 2, 4, 8, 16] {
        let settings = PiSettings::default()
            .with_precision(Precision::new(1024).unwrap())
            .with_workers(NonZeroUsize::new(workers).unwrap());
        group.bench_with_input(
            BenchmarkId::new("workers", workers),
            &settings,
            |b, settings| b.iter(|| black_box(compute_pi(rounds, settings).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_term, bench_pipeline);
criterion_main!(benches);
