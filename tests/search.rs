use hexen::evaluation::{evaluate, Score};
use hexen::hex::board::Board;
use hexen::hex::core::{Cell, Colour};
use hexen::hex::movegen::legal_moves;
use hexen::search::mcts::{Mcts, MctsConfig};
use hexen::search::minimax::{minimax_without_pruning, Minimax, MinimaxConfig};
use hexen::search::playout::{simulate, Playout, RandomPlayout};
use hexen::search::swap::{SwapConfig, SwapDecision};
use hexen::search::{Limits, SearchError, SelectionPolicy, Strategy};
use pretty_assertions::assert_eq;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fills `stones` random cells, alternating colours starting with Red.
fn random_board(width: u8, stones: usize, rng: &mut ChaCha8Rng) -> Board {
    let mut board = Board::new(width);
    let mut cells = legal_moves(&board);
    cells.shuffle(rng);
    let mut colour = Colour::Red;
    for cell in cells.into_iter().take(stones) {
        board.set_tile(cell, colour);
        colour = !colour;
    }
    board
}

#[test]
fn random_playout_on_standard_board() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..20 {
        let mut board = Board::standard();
        let winner = simulate(&mut board, Colour::Red, &mut rng).unwrap();
        assert!(board.occupied() <= 121);
        assert!(board.has_ended(winner));
        assert!(!board.has_ended(!winner));
    }
}

#[test]
fn mcts_plays_the_last_empty_cell() {
    for policy in [
        SelectionPolicy::Max,
        SelectionPolicy::Robust,
        SelectionPolicy::MaxRobust,
        SelectionPolicy::Secure,
    ] {
        let mut mcts = Mcts::new(MctsConfig {
            policy,
            seed: Some(3),
            ..MctsConfig::default()
        });
        let board = Board::from_rows("RB./BRB/RBR").unwrap();
        let result = mcts
            .choose_move(&board, Colour::Red, &Limits::iterations(50))
            .unwrap();
        assert_eq!(result.best_move, Cell::new(0, 2));
        assert_eq!(result.stats.best_visits, result.stats.root_visits);
    }
}

#[test]
fn mcts_defaults_to_movetime() {
    let mut mcts = Mcts::new(MctsConfig {
        movetime: std::time::Duration::from_millis(20),
        seed: Some(4),
        ..MctsConfig::default()
    });
    let result = mcts
        .choose_move(&Board::new(5), Colour::Blue, &Limits::default())
        .unwrap();
    assert!(result.stats.iterations > 0);
    assert_eq!(mcts.name(), "mcts");
}

#[test]
fn pruning_never_changes_the_decision() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..10 {
        let board = random_board(4, 5, &mut rng);
        if board.winner().is_some() {
            continue;
        }
        for own in Colour::ALL {
            for depth in 1..=3 {
                let mut minimax = Minimax::new(MinimaxConfig { depth });
                assert_eq!(
                    minimax.alpha_beta(&board, own, depth),
                    minimax_without_pruning(&board, own, depth),
                    "{board:?} {own} {depth}"
                );
            }
        }
    }
}

#[test]
fn minimax_depth_one_is_greedy() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let board = random_board(6, 8, &mut rng);
    let mut expected: Option<(Cell, Score)> = None;
    for cell in legal_moves(&board) {
        let mut child = board.clone();
        child.set_tile(cell, Colour::Red);
        let score = evaluate(&child, Colour::Red);
        if expected.map_or(true, |(_, best)| score > best) {
            expected = Some((cell, score));
        }
    }
    let result = Minimax::default()
        .choose_move(&board, Colour::Red, &Limits::depth(1))
        .unwrap();
    assert_eq!(Some((result.best_move, result.stats.score.unwrap())), expected);
}

#[test]
fn engines_reject_full_boards() {
    let board = Board::from_rows("RBR/BRB/RBR").unwrap();
    let mut engines: Vec<Box<dyn Strategy>> = vec![
        Box::new(Mcts::new(MctsConfig::default())),
        Box::new(Minimax::default()),
    ];
    for engine in &mut engines {
        assert_eq!(
            engine.choose_move(&board, Colour::Blue, &Limits::default()),
            Err(SearchError::NoLegalMoves),
            "{}",
            engine.name()
        );
    }
}

/// Makes the opponent win a fixed number of the first playouts.
struct Biased {
    opponent_wins: u32,
    calls: u32,
}

impl Playout for Biased {
    fn play(&mut self, _board: Board, to_move: Colour) -> Option<Colour> {
        self.calls += 1;
        if self.calls <= self.opponent_wins {
            Some(!to_move)
        } else {
            Some(to_move)
        }
    }
}

#[test]
fn swap_decision() {
    let board = Board::standard();
    let decision = SwapDecision::new(SwapConfig::default());

    let mut playout = Biased {
        opponent_wins: 20,
        calls: 0,
    };
    assert!(decision.decide(&board, Cell::new(5, 5), Colour::Blue, &mut playout));

    let mut playout = Biased {
        opponent_wins: 30,
        calls: 0,
    };
    assert!(!decision.decide(&board, Cell::new(0, 0), Colour::Blue, &mut playout));
    assert_eq!(playout.calls, 0);

    // Corners are rejected before any playout runs.
    let mut playout = RandomPlayout::new(9);
    assert!(!decision.decide(&board, Cell::new(10, 10), Colour::Blue, &mut playout));
}
