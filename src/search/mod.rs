//! [Search] is the "dynamic" position evaluation: it looks ahead into the
//! possible continuations to pick the move the agent plays.
//!
//! Two engines implement the same [`Strategy`] so that the turn handler does
//! not care which one runs:
//!
//! - [`mcts::Mcts`]: Monte Carlo Tree Search with the UCT tree policy and
//!   random playouts, bounded by wall-clock time or iteration count.
//! - [`minimax::Minimax`]: depth-bounded alpha-beta search over the
//!   connection-distance evaluation.
//!
//! [`swap::SwapDecision`] decides on the pie rule with the same playouts MCTS
//! uses.
//!
//! [Search]: https://www.chessprogramming.org/Search

use std::fmt;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::evaluation::Score;
use crate::hex::board::Board;
use crate::hex::core::{Cell, Colour};
use crate::hex::movegen::legal_moves;

pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod swap;
mod tree;

pub use tree::SelectionPolicy;

/// Search depth in plies.
pub type Depth = u8;

/// Errors the engines report instead of a move.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The board is full: there is nothing to search. The caller treats this
    /// as the end of the game.
    #[error("no legal moves available")]
    NoLegalMoves,

    /// No child is simultaneously the most visited and the most winning one.
    /// Recoverable by falling back to [`SelectionPolicy::Robust`].
    #[error("no child is maximal in both wins and visits")]
    NoMaximalChild,

    /// The move handed to the agent addresses a cell outside the board.
    #[error("{0} is outside the board")]
    OffBoard(Cell),
}

/// Budget of a single search. Unset fields do not constrain the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Wall-clock budget.
    pub time: Option<Duration>,
    /// Ply depth for [`minimax::Minimax`].
    pub depth: Option<Depth>,
    /// Maximum number of [`mcts::Mcts`] iterations.
    pub iterations: Option<u32>,
}

impl Limits {
    /// Only limits the wall-clock time.
    #[must_use]
    pub const fn time(time: Duration) -> Self {
        Self {
            time: Some(time),
            depth: None,
            iterations: None,
        }
    }

    /// Only limits the search depth.
    #[must_use]
    pub const fn depth(depth: Depth) -> Self {
        Self {
            time: None,
            depth: Some(depth),
            iterations: None,
        }
    }

    /// Only limits the number of MCTS iterations.
    #[must_use]
    pub const fn iterations(iterations: u32) -> Self {
        Self {
            time: None,
            depth: None,
            iterations: Some(iterations),
        }
    }
}

/// Keeps track of the budget while the search runs.
pub(crate) struct Limiter {
    pub(crate) timer: Instant,
    pub(crate) time: Option<Duration>,
    pub(crate) iterations: Option<u32>,
}

impl Limiter {
    pub(crate) fn new(time: Option<Duration>, iterations: Option<u32>) -> Self {
        Self {
            timer: Instant::now(),
            time,
            iterations,
        }
    }

    /// Returns `true` once either the iteration cap or the deadline is hit.
    pub(crate) fn exhausted(&self, iterations: u32) -> bool {
        if self.iterations.is_some_and(|limit| iterations >= limit) {
            return true;
        }
        self.time.is_some_and(|time| self.timer.elapsed() >= time)
    }
}

/// Counters collected by a search, reported in `info` lines and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Completed MCTS iterations.
    pub iterations: u32,
    /// Tree nodes (MCTS) or searched positions (minimax).
    pub nodes: u64,
    #[allow(missing_docs)]
    pub elapsed: Duration,
    /// Visits of the MCTS root.
    pub root_visits: u32,
    /// Visits of the chosen MCTS child.
    pub best_visits: u32,
    /// Win rate of the chosen MCTS child from the agent's perspective.
    pub win_rate: Option<f64>,
    /// Minimax value of the chosen move.
    pub score: Option<Score>,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes {} iterations {} time {}",
            self.nodes,
            self.iterations,
            self.elapsed.as_millis()
        )?;
        if let Some(win_rate) = self.win_rate {
            write!(f, " winrate {win_rate:.3}")?;
        }
        if let Some(score) = self.score {
            write!(f, " score {score}")?;
        }
        Ok(())
    }
}

/// Move chosen by a search together with the statistics of the search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    #[allow(missing_docs)]
    pub best_move: Cell,
    #[allow(missing_docs)]
    pub stats: SearchStats,
}

/// A search engine: chooses a move for `colour` on `board` within `limits`.
///
/// Implementations never touch `board` itself, every hypothetical move is
/// applied to a private copy.
pub trait Strategy {
    /// Runs the search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoLegalMoves`] if the board is full.
    fn choose_move(
        &mut self,
        board: &Board,
        colour: Colour,
        limits: &Limits,
    ) -> Result<SearchResult, SearchError>;

    /// Short name for logs and protocol output.
    fn name(&self) -> &'static str;
}

/// Picks a uniformly random empty cell.
///
/// # Errors
///
/// Returns [`SearchError::NoLegalMoves`] if the board is full.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Result<Cell, SearchError> {
    legal_moves(board)
        .choose(rng)
        .copied()
        .ok_or(SearchError::NoLegalMoves)
}
