//! Performance benchmarks for dispatch_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dispatch_core::matching::{pending_trips, DriverMatchScorer, MatchingConfig};
use dispatch_core::pricing::{compute_fare, RateTable, RateTier};
use dispatch_core::spatial::DistanceModelKind;
use dispatch_core::synthetic::{generate_snapshot, FleetParams};

fn bench_rank_pool_sizes(c: &mut Criterion) {
    let scorer = DriverMatchScorer::default();

    let mut group = c.benchmark_group("rank");
    for drivers in [100, 1_000, 10_000] {
        let snapshot = generate_snapshot(
            &FleetParams::default()
                .with_seed(42)
                .with_drivers(drivers)
                .with_trips(drivers / 2),
        );
        let trip = &snapshot.trips[0];
        group.bench_with_input(BenchmarkId::from_parameter(drivers), &snapshot, |b, snapshot| {
            b.iter(|| black_box(scorer.rank(trip, &snapshot.drivers, &snapshot.trips)));
        });
    }
    group.finish();
}

fn bench_distance_models(c: &mut Criterion) {
    let snapshot = generate_snapshot(&FleetParams::default().with_seed(7).with_drivers(1_000));
    let trip = &snapshot.trips[0];

    let mut group = c.benchmark_group("distance_model");
    for (name, kind) in [
        ("great_circle", DistanceModelKind::GreatCircle),
        ("h3_grid_res9", DistanceModelKind::H3Grid { resolution: 9 }),
    ] {
        let scorer = match DriverMatchScorer::new(MatchingConfig {
            distance_model: kind,
            ..MatchingConfig::default()
        }) {
            Ok(scorer) => scorer,
            Err(error) => panic!("bench config rejected: {error}"),
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(scorer.rank(trip, &snapshot.drivers, &snapshot.trips)));
        });
    }
    group.finish();
}

fn bench_rank_batch(c: &mut Criterion) {
    let scorer = DriverMatchScorer::default();
    let snapshot = generate_snapshot(
        &FleetParams::default()
            .with_seed(42)
            .with_drivers(500)
            .with_trips(400),
    );
    let pending = pending_trips(&snapshot.trips);

    c.bench_function("rank_batch_pending_500_drivers", |b| {
        b.iter(|| black_box(scorer.rank_batch(&pending, &snapshot.drivers, &snapshot.trips)));
    });
}

fn bench_fares(c: &mut Criterion) {
    let tiers: Vec<RateTier> = (0..20)
        .map(|n| {
            let from = f64::from(n) * 2.5;
            RateTier::new(from, from + 2.5, 12.0 + f64::from(n) * 3.0)
        })
        .collect();
    let table = match RateTable::new(tiers.clone(), 2.0) {
        Ok(table) => table,
        Err(error) => panic!("bench tiers rejected: {error}"),
    };

    let mut group = c.benchmark_group("fares");
    group.bench_function("compute_fare_validating", |b| {
        b.iter(|| black_box(compute_fare(black_box(37.3), &tiers, 2.0)));
    });
    group.bench_function("rate_table_prevalidated", |b| {
        b.iter(|| black_box(table.fare(black_box(37.3))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rank_pool_sizes,
    bench_distance_models,
    bench_rank_batch,
    bench_fares
);
criterion_main!(benches);
