//! Criterion benchmarks measure time of the clearly separated pieces of code.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hexen::evaluation::evaluate;
use hexen::hex::board::Board;
use hexen::hex::connectivity::{connection_distance, winner};
use hexen::hex::core::{Colour, BOARD_WIDTH};
use hexen::hex::movegen::legal_moves;
use hexen::search::mcts::{Mcts, MctsConfig};
use hexen::search::minimax::{Minimax, MinimaxConfig};
use hexen::search::playout::simulate;
use hexen::search::{Limits, Strategy};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Boards in the middle of random games: half of the cells are filled by
/// alternating random moves, stopping before either side connects.
fn midgame_boards(width: u8, count: usize) -> Vec<Board> {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    (0..count)
        .map(|_| {
            let mut board = Board::new(width);
            let mut cells = legal_moves(&board);
            cells.shuffle(&mut rng);
            let mut colour = Colour::Red;
            for cell in cells.into_iter().take(usize::from(width) * usize::from(width) / 2) {
                board.set_tile(cell, colour);
                if board.has_ended(colour) {
                    board.clear_tile(cell);
                    break;
                }
                colour = !colour;
            }
            board
        })
        .collect()
}

fn playouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Playout");
    for width in [7, BOARD_WIDTH, 19] {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = group.bench_with_input(BenchmarkId::new("empty board", width), &width, |b, &width| {
            b.iter(|| {
                let mut board = Board::new(width);
                criterion::black_box(simulate(&mut board, Colour::Red, &mut rng))
            });
        });
    }
    group.finish();
}

fn connectivity(c: &mut Criterion) {
    let boards = midgame_boards(BOARD_WIDTH, 100);
    let mut group = c.benchmark_group("Connectivity");
    let _ = group.bench_with_input(
        BenchmarkId::new("winner", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = criterion::black_box(winner(board));
                }
            });
        },
    );
    let _ = group.bench_with_input(
        BenchmarkId::new("connection distance", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = criterion::black_box(connection_distance(board, Colour::Blue));
                }
            });
        },
    );
    let _ = group.bench_with_input(
        BenchmarkId::new("evaluation", format!("{} positions", boards.len())),
        &boards,
        |b, boards| {
            b.iter(|| {
                for board in boards {
                    let _ = criterion::black_box(evaluate(board, Colour::Red));
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = primitives;
    config = Criterion::default().sample_size(50);
    targets = playouts, connectivity
}

fn mcts(c: &mut Criterion) {
    let mut group = c.benchmark_group("MCTS");
    for iterations in [100, 1000] {
        let _ = group.bench_with_input(
            BenchmarkId::new("standard board", format!("{iterations} iterations")),
            &iterations,
            |b, &iterations| {
                let mut mcts = Mcts::new(MctsConfig {
                    seed: Some(2),
                    ..MctsConfig::default()
                });
                let board = Board::standard();
                b.iter(|| {
                    criterion::black_box(mcts.choose_move(
                        &board,
                        Colour::Red,
                        &Limits::iterations(iterations),
                    ))
                });
            },
        );
    }
    group.finish();
}

fn minimax(c: &mut Criterion) {
    let boards = midgame_boards(7, 10);
    let mut group = c.benchmark_group("Minimax");
    for depth in [1, 2] {
        let _ = group.bench_with_input(
            BenchmarkId::new("7x7 midgame", format!("depth {depth}")),
            &depth,
            |b, &depth| {
                let mut minimax = Minimax::new(MinimaxConfig { depth });
                b.iter(|| {
                    for board in &boards {
                        let _ = criterion::black_box(minimax.choose_move(
                            board,
                            Colour::Red,
                            &Limits::default(),
                        ));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = search;
    config = Criterion::default().sample_size(10);
    targets = mcts, minimax
}

criterion_main!(primitives, search);
