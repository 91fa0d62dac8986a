//! Benchmarks for eventca-window operations.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use eventca_primitives::{Date, EventTable, ReturnSeries};
use eventca_window::{WindowConfig, build_windowed_returns, construct_event_windows};
use rand::Rng;

fn day(i: usize) -> Date {
    Date::from_num_days_from_ce_opt(730_000 + i as i32).unwrap()
}

fn random_returns(n: usize) -> ReturnSeries {
    let mut rng = rand::thread_rng();
    let values = (0..n).map(|_| rng.r#gen::<f64>() * 0.04 - 0.02).collect();
    ReturnSeries::new((0..n).map(day).collect(), values).unwrap()
}

fn random_events(n_events: usize, n_days: usize) -> EventTable {
    let mut rng = rand::thread_rng();
    EventTable::new((0..n_events).map(|_| day(rng.gen_range(0..n_days))).collect())
}

fn bench_windowed_returns(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_windowed_returns");
    let config = WindowConfig::default();

    for n_days in [500, 2500, 10000] {
        group.throughput(Throughput::Elements(n_days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_days), &n_days, |b, &n_days| {
            let returns = random_returns(n_days);
            b.iter(|| build_windowed_returns(black_box(&returns), &config).unwrap());
        });
    }

    group.finish();
}

fn bench_construct_event_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct_event_windows");
    group.sample_size(30);
    let config = WindowConfig::default();
    let n_days = 5000;
    let returns = random_returns(n_days);

    for n_events in [100, 1000, 5000] {
        group.throughput(Throughput::Elements(n_events as u64));
        group.bench_with_input(BenchmarkId::new("events", n_events), &n_events, |b, &n_events| {
            let events = random_events(n_events, n_days);
            b.iter(|| construct_event_windows(black_box(&events), &returns, &config).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_windowed_returns, bench_construct_event_windows);
criterion_main!(benches);
