//! Pie rule: on the second ply the player may take over the opening move
//! instead of answering it.
//!
//! The decision is a Monte-Carlo estimate. The opening stone is scored by
//! random games played as if the opponent kept it, and the swap is worth it
//! when those games favour the opponent and the stone is close enough to the
//! centre.

use tracing::debug;

use crate::hex::board::Board;
use crate::hex::core::{Cell, Colour};
use crate::search::playout::Playout;

/// Parameters of the swap decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapConfig {
    /// Number of playouts per decision.
    pub samples: u32,
    /// Swap only when the opponent wins strictly more than this share of the
    /// playouts.
    pub win_rate_threshold: f64,
    /// Swap only when the opening stone is strictly closer to the centre than
    /// this, see [`centre_bias`].
    pub bias_threshold: f64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            samples: 30,
            win_rate_threshold: 0.55,
            bias_threshold: 0.65,
        }
    }
}

/// Statistics behind a swap decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwapEstimate {
    /// Share of playouts won by the player who made the opening move.
    pub win_rate: f64,
    #[allow(missing_docs)]
    pub bias: f64,
}

/// Normalised Manhattan distance of `cell` from the centre of a `width` board:
/// `0` in the centre and `1` in the two far corners.
#[must_use]
pub fn centre_bias(cell: Cell, width: u8) -> f64 {
    if width <= 1 {
        return 0.0;
    }
    let centre = f64::from(width - 1) / 2.0;
    let distance = (f64::from(cell.x()) - centre).abs() + (f64::from(cell.y()) - centre).abs();
    distance / (2.0 * centre)
}

/// Decides whether to swap after the opponent's opening move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwapDecision {
    config: SwapConfig,
}

impl SwapDecision {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(config: SwapConfig) -> Self {
        Self { config }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Plays [`SwapConfig::samples`] games from `board` with the opponent's
    /// stone on `first_move` and `own` to move.
    pub fn estimate(
        &self,
        board: &Board,
        first_move: Cell,
        own: Colour,
        playout: &mut impl Playout,
    ) -> SwapEstimate {
        let opponent = !own;
        let mut opponent_wins = 0_u32;
        for _ in 0..self.config.samples {
            let mut sample = board.clone();
            sample.set_tile(first_move, opponent);
            if playout.play(sample, own) == Some(opponent) {
                opponent_wins += 1;
            }
        }
        let win_rate = if self.config.samples == 0 {
            0.0
        } else {
            f64::from(opponent_wins) / f64::from(self.config.samples)
        };
        SwapEstimate {
            win_rate,
            bias: centre_bias(first_move, board.size()),
        }
    }

    /// Returns `true` if `own` should swap after the opponent opened on
    /// `first_move`. Corner openings are never swapped and cost no playouts.
    pub fn decide(
        &self,
        board: &Board,
        first_move: Cell,
        own: Colour,
        playout: &mut impl Playout,
    ) -> bool {
        if first_move.is_corner(board.size()) {
            debug!(%first_move, "corner opening, not swapping");
            return false;
        }
        let estimate = self.estimate(board, first_move, own, playout);
        let swap = estimate.win_rate > self.config.win_rate_threshold
            && estimate.bias < self.config.bias_threshold;
        debug!(
            %first_move,
            win_rate = estimate.win_rate,
            bias = estimate.bias,
            swap,
            "swap decision"
        );
        swap
    }
}
