//! This module implements "static" [evaluation], i.e. predicting the value of
//! a Hex position without [`crate::search`].
//!
//! The evaluation compares how far each player is from connecting their sides
//! (see [`connection_distance`]): every stone the opponent still needs on top
//! of what the agent needs is worth one point.
//!
//! [evaluation]: https://www.chessprogramming.org/Evaluation

use crate::hex::board::Board;
use crate::hex::connectivity::{connection_distance, winner};
use crate::hex::core::Colour;

mod score;

pub use score::Score;

/// Evaluates the board from the perspective of `own`:
/// `distance(opponent) - distance(own)`. Won and lost boards evaluate to
/// [`Score::WIN`] and [`Score::LOSE`].
#[must_use]
pub fn evaluate(board: &Board, own: Colour) -> Score {
    match winner(board) {
        Some(colour) if colour == own => Score::WIN,
        Some(_) => Score::LOSE,
        None => {
            let own_distance = connection_distance(board, own);
            let opponent_distance = connection_distance(board, !own);
            // Distances are bounded by the number of cells.
            #[allow(clippy::cast_possible_wrap)]
            let advantage = opponent_distance as i32 - own_distance as i32;
            Score::heuristic(advantage)
        },
    }
}
