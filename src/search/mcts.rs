//! Implements [Monte Carlo Tree Search] (MCTS) with the UCT tree policy.
//!
//! Every iteration consists of four steps:
//!
//! 1. Selection: starting from the root, descend into the child with the
//!    highest UCT score while the current node is fully expanded.
//! 2. Expansion: add a child for one of the node's untried moves.
//! 3. Simulation: play the game out with random moves from the new child.
//! 4. Backpropagation: update visits and wins on the path back to the root.
//!
//! Wins are always counted for the colour the search runs for, not for the
//! colour moving at each node: a node's win rate is the agent's chance of
//! winning through that branch.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::hex::board::Board;
use crate::hex::core::Colour;
use crate::hex::movegen::legal_moves;
use crate::search::playout::simulate;
use crate::search::tree::{NodeIndex, Tree};
use crate::search::{
    random_move, Limiter, Limits, SearchError, SearchResult, SearchStats, SelectionPolicy,
    Strategy,
};

/// Parameters of the MCTS engine.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Exploration constant `c` of the UCT formula
    /// `wins / visits + c * sqrt(2 * ln(parent visits) / visits)`.
    pub exploration: f64,
    /// How the move is picked among the root's children.
    pub policy: SelectionPolicy,
    /// Time budget used when [`Limits`] constrain neither time nor iterations.
    pub movetime: Duration,
    /// Seed for move ordering and playouts. Seeded from the OS when unset.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration: 1.4,
            policy: SelectionPolicy::Robust,
            movetime: Duration::from_secs(1),
            seed: None,
        }
    }
}

/// Monte Carlo Tree Search engine. The tree is rebuilt for every search.
#[derive(Debug)]
pub struct Mcts {
    config: MctsConfig,
    rng: ChaCha8Rng,
}

impl Mcts {
    #[must_use]
    #[allow(missing_docs)]
    pub fn new(config: MctsConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self { config, rng }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Runs one selection-expansion-simulation-backpropagation cycle on a
    /// private copy of the root board.
    fn iterate(&mut self, tree: &mut Tree, root: &Board, own: Colour) {
        let mut board = root.clone();
        let mut to_move = own;
        let mut node = Tree::ROOT;

        while tree.is_fully_expanded(node) {
            let Some(child) = tree.select_child(node, self.config.exploration) else {
                // Terminal position: nothing to expand.
                break;
            };
            if let Some(cell) = tree.node(child).cell() {
                board.set_tile(cell, to_move);
            }
            to_move = !to_move;
            node = child;
        }

        if let Some(cell) = tree.pop_untried(node) {
            board.set_tile(cell, to_move);
            let untried = if board.has_ended(to_move) {
                Vec::new()
            } else {
                let mut moves = legal_moves(&board);
                moves.shuffle(&mut self.rng);
                moves
            };
            to_move = !to_move;
            node = tree.expand(node, cell, untried);
        }

        let winner = simulate(&mut board, to_move, &mut self.rng);
        trace!(node, ?winner, "playout finished");
        tree.backpropagate(node, winner == Some(own));
    }

    fn pick(tree: &Tree, policy: SelectionPolicy) -> Result<NodeIndex, SearchError> {
        match tree.best_child(policy) {
            Err(SearchError::NoMaximalChild) => {
                debug!(%policy, "no maximal child, falling back to robust selection");
                tree.best_child(SelectionPolicy::Robust)
            },
            result => result,
        }
    }
}

impl Strategy for Mcts {
    fn choose_move(
        &mut self,
        board: &Board,
        colour: Colour,
        limits: &Limits,
    ) -> Result<SearchResult, SearchError> {
        let mut moves = legal_moves(board);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        let time = match (limits.time, limits.iterations) {
            (None, None) => Some(self.config.movetime),
            (time, _) => time,
        };
        let limiter = Limiter::new(time, limits.iterations);

        moves.shuffle(&mut self.rng);
        let mut tree = Tree::new(moves);
        let mut iterations = 0;
        while !limiter.exhausted(iterations) {
            self.iterate(&mut tree, board, colour);
            iterations += 1;
        }

        let mut stats = SearchStats {
            iterations,
            nodes: tree.len() as u64,
            elapsed: limiter.timer.elapsed(),
            root_visits: tree.node(Tree::ROOT).visits(),
            ..SearchStats::default()
        };

        if iterations == 0 {
            warn!(?time, "search budget exhausted before the first iteration, playing a random move");
            return Ok(SearchResult {
                best_move: random_move(board, &mut self.rng)?,
                stats,
            });
        }

        let best = Self::pick(&tree, self.config.policy)?;
        let node = tree.node(best);
        stats.best_visits = node.visits();
        stats.win_rate = Some(node.win_rate());
        // Root children always carry a move.
        let best_move = node.cell().ok_or(SearchError::NoLegalMoves)?;
        debug!(%colour, %best_move, %stats, "mcts search finished");
        Ok(SearchResult { best_move, stats })
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}
