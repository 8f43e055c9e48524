use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use tilesweep_core::{
    Board, GameConfig, GameSession, MineLayout, MinefieldGenerator, PlacementStrategy,
    RandomMinefieldGenerator,
};

const EXPERT: GameConfig = GameConfig::new_unchecked(30, 16, 99);
const DENSE: GameConfig = GameConfig::new_unchecked(30, 16, 400);

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [("expert", EXPERT), ("dense", DENSE)] {
        for strategy in [PlacementStrategy::Rejection, PlacementStrategy::PartialShuffle] {
            group.bench_function(format!("{name}.{strategy:?}"), |b| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed += 1;
                    black_box(RandomMinefieldGenerator::new(seed, strategy).generate(config))
                });
            });
        }
    }
    group.finish();
}

fn bench_open_board_cascade(c: &mut Criterion) {
    // a single mine in the far corner leaves one zero region covering the board
    let layout = MineLayout::from_indices((256, 256), &[256 * 256 - 1]).unwrap();

    c.bench_function("reveal.cascade_256x256", |b| {
        b.iter_batched(
            || GameSession::from_layout(layout.clone(), ()),
            |mut session| black_box(session.reveal_tile(0)),
            BatchSize::LargeInput,
        );
    });
}

fn bench_board_build(c: &mut Criterion) {
    c.bench_function("board.place_mines.expert", |b| {
        b.iter(|| {
            let mut board = Board::new(EXPERT).unwrap();
            board
                .place_mines(RandomMinefieldGenerator::new(7, PlacementStrategy::Auto))
                .unwrap();
            black_box(board)
        });
    });
}

criterion_group!(
    benches,
    bench_generation,
    bench_open_board_cascade,
    bench_board_build
);
criterion_main!(benches);
