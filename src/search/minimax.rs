//! Implementation of [Minimax] algorithm with [Alpha-Beta pruning].
//!
//! The search alternates between the agent maximizing and the opponent
//! minimizing the static evaluation ([`crate::evaluation::evaluate`]), which is
//! always computed from the agent's perspective. Inner values returned after a
//! cutoff are only bounds: just the decision at the root is exact.
//!
//! [Minimax]: https://en.wikipedia.org/wiki/Minimax
//! [Alpha-Beta pruning]: https://en.wikipedia.org/wiki/Alpha%E2%80%93beta_pruning

use std::time::Instant;

use tracing::debug;

use crate::evaluation::{evaluate, Score};
use crate::hex::board::Board;
use crate::hex::core::{Cell, Colour};
use crate::hex::movegen::legal_moves;
use crate::search::{Depth, Limits, SearchError, SearchResult, SearchStats, Strategy};

/// Parameters of the minimax engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinimaxConfig {
    /// Search depth in plies when [`Limits`] do not set one. The branching
    /// factor is the number of empty cells, so this has to stay small.
    pub depth: Depth,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self { depth: 2 }
    }
}

/// Depth-bounded alpha-beta search engine.
#[derive(Debug, Default)]
pub struct Minimax {
    config: MinimaxConfig,
    nodes: u64,
}

impl Minimax {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(config: MinimaxConfig) -> Self {
        Self { config, nodes: 0 }
    }

    /// Searches `depth` plies ahead (at least one) and returns the best move
    /// for `own` with its value, or `None` if the board is full.
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        own: Colour,
        depth: Depth,
    ) -> Option<(Cell, Score)> {
        let depth = depth.max(1);
        let mut best: Option<(Cell, Score)> = None;
        let mut alpha = -Score::INFINITY;
        let beta = Score::INFINITY;
        for cell in legal_moves(board) {
            let mut child = board.clone();
            child.set_tile(cell, own);
            let value = self.min_value(&child, own, depth - 1, alpha, beta);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((cell, value));
            }
            alpha = alpha.max(value);
        }
        best
    }

    fn max_value(
        &mut self,
        board: &Board,
        own: Colour,
        depth: Depth,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes += 1;
        if depth == 0 || board.winner().is_some() {
            return evaluate(board, own);
        }
        let moves = legal_moves(board);
        if moves.is_empty() {
            return evaluate(board, own);
        }
        let mut value = -Score::INFINITY;
        for cell in moves {
            let mut child = board.clone();
            child.set_tile(cell, own);
            value = value.max(self.min_value(&child, own, depth - 1, alpha, beta));
            if value >= beta {
                return value;
            }
            alpha = alpha.max(value);
        }
        value
    }

    fn min_value(
        &mut self,
        board: &Board,
        own: Colour,
        depth: Depth,
        alpha: Score,
        mut beta: Score,
    ) -> Score {
        self.nodes += 1;
        if depth == 0 || board.winner().is_some() {
            return evaluate(board, own);
        }
        let moves = legal_moves(board);
        if moves.is_empty() {
            return evaluate(board, own);
        }
        let mut value = Score::INFINITY;
        for cell in moves {
            let mut child = board.clone();
            child.set_tile(cell, !own);
            value = value.min(self.max_value(&child, own, depth - 1, alpha, beta));
            if value <= alpha {
                return value;
            }
            beta = beta.min(value);
        }
        value
    }
}

impl Strategy for Minimax {
    fn choose_move(
        &mut self,
        board: &Board,
        colour: Colour,
        limits: &Limits,
    ) -> Result<SearchResult, SearchError> {
        let timer = Instant::now();
        let depth = limits.depth.unwrap_or(self.config.depth);
        self.nodes = 0;
        let (best_move, score) = self
            .alpha_beta(board, colour, depth)
            .ok_or(SearchError::NoLegalMoves)?;
        let stats = SearchStats {
            nodes: self.nodes,
            elapsed: timer.elapsed(),
            score: Some(score),
            ..SearchStats::default()
        };
        debug!(%colour, depth, %best_move, %stats, "minimax search finished");
        Ok(SearchResult { best_move, stats })
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

/// Plain minimax without pruning. Visits every position up to `depth` plies
/// and is only useful as a reference for [`Minimax::alpha_beta`].
#[must_use]
pub fn minimax_without_pruning(
    board: &Board,
    own: Colour,
    depth: Depth,
) -> Option<(Cell, Score)> {
    fn value(board: &Board, own: Colour, to_move: Colour, depth: Depth) -> Score {
        if depth == 0 || board.winner().is_some() {
            return evaluate(board, own);
        }
        let values = legal_moves(board).into_iter().map(|cell| {
            let mut child = board.clone();
            child.set_tile(cell, to_move);
            value(&child, own, !to_move, depth - 1)
        });
        let best = if to_move == own {
            values.max()
        } else {
            values.min()
        };
        best.unwrap_or_else(|| evaluate(board, own))
    }

    let depth = depth.max(1);
    let mut best: Option<(Cell, Score)> = None;
    for cell in legal_moves(board) {
        let mut child = board.clone();
        child.set_tile(cell, own);
        let score = value(&child, own, !own, depth - 1);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((cell, score));
        }
    }
    best
}
