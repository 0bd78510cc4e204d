use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridblocks::core::board::BoardState;
use gridblocks::core::engine::{EngineConfig, GameEngine, GamePhase};
use gridblocks::core::lines::{clear_lines, detect_full_lines, LineBuffer};
use gridblocks::core::search::find_valid_placements;
use gridblocks::core::shapes::ShapeLibrary;
use gridblocks::core::spawner::{BlockSpawner, SpawnerConfig};
use gridblocks::types::CellState;

fn bench_place_and_clear(c: &mut Criterion) {
    c.bench_function("place_clear_one_row", |b| {
        b.iter(|| {
            let mut board = BoardState::new(8, 8);
            for x in 0..7 {
                board.fill_cell(x, 0, CellState::filled(1, 1));
            }
            board.fill_cell(black_box(7), 0, CellState::filled(2, 2));
            let mut buf = LineBuffer::new();
            detect_full_lines(&board, &mut buf);
            clear_lines(&mut board, &buf.rows, &buf.cols);
        })
    });
}

fn bench_detect_lines(c: &mut Criterion) {
    let mut board = BoardState::new(8, 8);
    // Checkerboard: worst case for candidate re-scans without full lines.
    for y in 0..8i8 {
        for x in 0..8i8 {
            if (x + y) % 2 == 0 {
                board.fill_cell(x, y, CellState::filled(1, 1));
            }
        }
    }
    let mut buf = LineBuffer::new();
    c.bench_function("detect_full_lines", |b| {
        b.iter(|| {
            detect_full_lines(black_box(&board), &mut buf);
        })
    });
}

fn bench_placement_enumeration(c: &mut Criterion) {
    let mut board = BoardState::new(8, 8);
    for y in 0..8i8 {
        for x in 0..8i8 {
            if (x * 7 + y * 3) % 5 == 0 {
                board.fill_cell(x, y, CellState::filled(1, 1));
            }
        }
    }
    let library = ShapeLibrary::standard();
    c.bench_function("enumerate_all_placements", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for shape in library.iter() {
                total += find_valid_placements(black_box(&board), shape).len();
            }
            total
        })
    });
}

fn bench_spawn_block_set(c: &mut Criterion) {
    let board = BoardState::new(8, 8);
    let library = ShapeLibrary::standard();
    let mut spawner = BlockSpawner::new(12345, SpawnerConfig::default());
    c.bench_function("spawn_block_set", |b| {
        b.iter(|| {
            spawner.spawn_block_set(black_box(&board), &library);
        })
    });
}

fn bench_full_move(c: &mut Criterion) {
    c.bench_function("greedy_move", |b| {
        let mut engine = GameEngine::new(
            EngineConfig {
                seed: 12345,
                ..Default::default()
            },
            ShapeLibrary::standard(),
        );
        engine.new_game();
        b.iter(|| {
            if engine.phase() != GamePhase::Playing {
                engine.new_game();
            }
            let next = (0..3).find_map(|s| engine.valid_placements(s).first().map(|&a| (s, a)));
            if let Some((slot, anchor)) = next {
                let _ = engine.try_place_block(black_box(slot), anchor);
            } else {
                engine.new_game();
            }
        })
    });
}

criterion_group!(
    benches,
    bench_place_and_clear,
    bench_detect_lines,
    bench_placement_enumeration,
    bench_spawn_block_set,
    bench_full_move
);
criterion_main!(benches);
