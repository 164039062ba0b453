//! Criterion benchmarks for the Umbra economy engine.
//!
//! Two groups:
//! - `lazy_update`: one refresh folding in a year of growth, and one
//!   draining a deep arrival queue in a single call.
//! - `move_math`: the decay formula and a full move command.

use criterion::{Criterion, criterion_group, criterion_main};
use umbra_core::command::{MoveOrder, decayed_arrival};
use umbra_core::test_utils::*;

fn fixture() -> Vec<umbra_core::planet::PlanetDescriptor> {
    vec![
        descriptor(1, 0, 0, 0),
        descriptor(2, 100, 0, 0),
        silver_descriptor(3, 60, 80, 2),
    ]
}

fn bench_lazy_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_update");

    group.bench_function("year_of_growth", |b| {
        let mut engine = test_engine(fixture());
        engine.initialize_player(player(1), pid(1), 1).unwrap();
        let mut now = 1u64;
        b.iter(|| {
            now += 31_536_000;
            engine.refresh_planet(pid(1), now).unwrap()
        });
    });

    group.bench_function("drain_queue_of_64", |b| {
        b.iter_batched(
            || {
                let mut engine = test_engine(fixture());
                engine.initialize_player(player(1), pid(1), 1).unwrap();
                let mut now = 1u64;
                for _ in 0..64 {
                    now += 3_600;
                    engine
                        .move_fleet(MoveOrder {
                            player: player(1),
                            from: pid(1),
                            to: pid(2),
                            max_distance: 100,
                            energy: 8_000,
                            silver: 0,
                            now,
                        })
                        .ok();
                }
                (engine, now)
            },
            |(mut engine, now)| engine.refresh_planet(pid(2), now + 1_000_000).unwrap(),
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_move_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_math");

    group.bench_function("decayed_arrival", |b| {
        b.iter(|| decayed_arrival(50_000, 137, 160, 100_000, 5));
    });

    group.bench_function("move_command", |b| {
        let mut engine = test_engine(fixture());
        engine.initialize_player(player(1), pid(1), 1).unwrap();
        let mut now = 1u64;
        b.iter(|| {
            now += 60;
            engine
                .move_fleet(MoveOrder {
                    player: player(1),
                    from: pid(1),
                    to: pid(2),
                    max_distance: 100,
                    energy: 9_000,
                    silver: 0,
                    now,
                })
                .ok()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lazy_update, bench_move_math);
criterion_main!(benches);
