//! Random playouts (rollouts): games played to the end with uniformly random
//! moves, used to estimate the value of a position statistically.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::hex::board::Board;
use crate::hex::connectivity::Connections;
use crate::hex::core::Colour;
use crate::hex::movegen::legal_moves;

/// Plays the game on `board` to the end with uniformly random moves,
/// alternating colours starting with `to_move`. Returns the winner.
///
/// Every step fills one of the empty cells, so the playout ends after at most
/// as many moves as there are empty cells. Since Hex has no draws, `None` is
/// only possible for boards that were in an inconsistent state to begin with.
pub fn simulate<R: Rng + ?Sized>(
    board: &mut Board,
    to_move: Colour,
    rng: &mut R,
) -> Option<Colour> {
    let mut connections = Connections::new(board);
    if let Some(winner) = connections.winner() {
        return Some(winner);
    }
    // Playing the empty cells in a random order is the same as choosing a
    // random empty cell on every step.
    let mut moves = legal_moves(board);
    moves.shuffle(rng);
    let mut colour = to_move;
    for cell in moves {
        if let Some(winner) = connections.place(board, cell, colour) {
            return Some(winner);
        }
        colour = !colour;
    }
    connections.winner()
}

/// Source of playout results. Abstracts over [`RandomPlayout`] so that
/// procedures built on playouts can be exercised with scripted outcomes.
pub trait Playout {
    /// Plays a game from `board` with `to_move` to move and returns the
    /// winner.
    fn play(&mut self, board: Board, to_move: Colour) -> Option<Colour>;
}

/// Uniformly random playouts driven by a seedable RNG.
#[derive(Clone, Debug)]
pub struct RandomPlayout {
    rng: ChaCha8Rng,
}

impl RandomPlayout {
    /// Creates a playout generator with reproducible results.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a playout generator seeded from the OS entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Playout for RandomPlayout {
    fn play(&mut self, mut board: Board, to_move: Colour) -> Option<Colour> {
        simulate(&mut board, to_move, &mut self.rng)
    }
}
