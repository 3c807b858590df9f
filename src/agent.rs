//! Turn handler: the single entry point the outside world calls on every turn.
//!
//! The agent answers the opening move with the pie-rule decision and hands
//! every other turn to the configured [`Strategy`].

use std::fmt;

use tracing::{debug, info};

use crate::hex::board::Board;
use crate::hex::core::{Colour, Move};
use crate::search::mcts::{Mcts, MctsConfig};
use crate::search::minimax::{Minimax, MinimaxConfig};
use crate::search::playout::RandomPlayout;
use crate::search::swap::{SwapConfig, SwapDecision};
use crate::search::{Limits, SearchError, SearchResult, SearchStats, Strategy};

/// Search engine choosing the moves after the opening.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineKind {
    #[default]
    #[allow(missing_docs)]
    Mcts,
    #[allow(missing_docs)]
    Minimax,
}

impl TryFrom<&str> for EngineKind {
    type Error = anyhow::Error;

    fn try_from(engine: &str) -> anyhow::Result<Self> {
        match engine.to_ascii_lowercase().as_str() {
            "mcts" => Ok(Self::Mcts),
            "minimax" | "alphabeta" => Ok(Self::Minimax),
            _ => anyhow::bail!("engine should be mcts or minimax, got '{engine}'"),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mcts => "mcts",
            Self::Minimax => "minimax",
        })
    }
}

/// Everything needed to build an [`Agent`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentConfig {
    #[allow(missing_docs)]
    pub engine: EngineKind,
    #[allow(missing_docs)]
    pub mcts: MctsConfig,
    #[allow(missing_docs)]
    pub minimax: MinimaxConfig,
    #[allow(missing_docs)]
    pub swap: SwapConfig,
    /// Budget of every search. Defaults leave the engines to their own
    /// configuration.
    pub limits: Limits,
    /// Seed for every random component of the agent. Overrides
    /// [`MctsConfig::seed`] when set. Seeded from the OS when unset.
    pub seed: Option<u64>,
}

/// Plays one side of a game.
pub struct Agent {
    colour: Colour,
    strategy: Box<dyn Strategy + Send>,
    swap: SwapDecision,
    playout: RandomPlayout,
    limits: Limits,
    last_stats: Option<SearchStats>,
}

impl Agent {
    /// Creates an agent playing `colour`.
    #[must_use]
    pub fn new(colour: Colour, config: &AgentConfig) -> Self {
        let strategy: Box<dyn Strategy + Send> = match config.engine {
            EngineKind::Mcts => Box::new(Mcts::new(MctsConfig {
                seed: config.seed.or(config.mcts.seed),
                ..config.mcts.clone()
            })),
            EngineKind::Minimax => Box::new(Minimax::new(config.minimax)),
        };
        let playout = config.seed.map_or_else(RandomPlayout::from_entropy, |seed| {
            RandomPlayout::new(seed.wrapping_add(1))
        });
        Self {
            colour,
            strategy,
            swap: SwapDecision::new(config.swap),
            playout,
            limits: config.limits,
            last_stats: None,
        }
    }

    /// Colour of the stones the agent currently places.
    #[must_use]
    pub const fn colour(&self) -> Colour {
        self.colour
    }

    /// Name of the engine behind the agent.
    #[must_use]
    pub fn engine(&self) -> &'static str {
        self.strategy.name()
    }

    /// Statistics of the search behind the last placement, `None` if the last
    /// move was a swap or no move was made yet.
    #[must_use]
    pub const fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    /// Exchanges the agent's colour. Called on the player whose opening move
    /// was taken over by the opponent.
    pub fn swap_colours(&mut self) {
        self.colour = !self.colour;
    }

    /// Chooses the move for `turn` (starting from 1). `opponent_move` is the
    /// move played just before, `None` on the first turn.
    ///
    /// On turn 2 the agent may answer the opening placement with
    /// [`Move::Swap`], in which case it takes over the opponent's colour.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoLegalMoves`] if the board is full and
    /// [`SearchError::OffBoard`] if `opponent_move` lies outside the board.
    pub fn make_move(
        &mut self,
        turn: u16,
        board: &Board,
        opponent_move: Option<Move>,
    ) -> Result<Move, SearchError> {
        self.last_stats = None;
        if let Some(Move::Place(cell)) = opponent_move {
            if !board.contains(cell) {
                return Err(SearchError::OffBoard(cell));
            }
        }
        if let (2, Some(Move::Place(first_move))) = (turn, opponent_move) {
            if self
                .swap
                .decide(board, first_move, self.colour, &mut self.playout)
            {
                info!(%first_move, from = %self.colour, "swapping colours");
                self.swap_colours();
                return Ok(Move::Swap);
            }
        }
        let SearchResult { best_move, stats } = self.search(board)?;
        debug!(
            turn,
            colour = %self.colour,
            engine = self.engine(),
            %best_move,
            %stats,
            "move chosen"
        );
        self.last_stats = Some(stats);
        Ok(Move::Place(best_move))
    }

    /// Runs the search without the swap decision and returns the full result,
    /// statistics included.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoLegalMoves`] if the board is full.
    pub fn search(&mut self, board: &Board) -> Result<SearchResult, SearchError> {
        self.strategy.choose_move(board, self.colour, &self.limits)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("colour", &self.colour)
            .field("engine", &self.strategy.name())
            .field("swap", &self.swap)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
