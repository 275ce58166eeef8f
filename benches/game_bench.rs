//! Benchmarks for full simulated games and the legality oracle.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gaple::rules::can_play;
use gaple::tiles::{DeckRange, OpenEnds};
use gaple::{GameConfig, GameEngine, GreedyPolicy, HeaviestFirstPolicy, Session};

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    group.bench_function("greedy_22", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let config = GameConfig::default().with_seed(seed);
            let mut session = Session::new(config, GreedyPolicy).unwrap();
            session.start();
            black_box(session.run_with_human(&GreedyPolicy, u64::MAX))
        });
    });

    group.bench_function("heaviest_double_six", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let config = GameConfig::default()
                .with_deck(DeckRange::double_six())
                .with_seed(seed);
            let mut session = Session::new(config, HeaviestFirstPolicy).unwrap();
            session.start();
            black_box(session.run_with_human(&HeaviestFirstPolicy, u64::MAX))
        });
    });

    group.finish();
}

fn bench_start(c: &mut Criterion) {
    c.bench_function("start_game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut engine = GameEngine::new(GameConfig::default().with_seed(seed)).unwrap();
            black_box(engine.start_game())
        });
    });
}

fn bench_oracle(c: &mut Criterion) {
    let tiles = DeckRange::double_six().generate();
    let ends = Some(OpenEnds::new(3, 5));
    c.bench_function("can_play_double_six", |b| {
        b.iter(|| {
            tiles
                .iter()
                .filter(|&&t| can_play(black_box(t), ends).is_playable())
                .count()
        });
    });
}

criterion_group!(benches, bench_full_game, bench_start, bench_oracle);
criterion_main!(benches);
