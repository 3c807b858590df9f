use std::fmt::Display;
use std::ops::Neg;

/// The score represents the value of the position from the perspective of the
/// agent the search runs for: either a heuristic estimate or a decided game.
///
/// A heuristic score is bounded by the number of cells on the board, decided
/// games are mapped to [`Score::WIN`] and [`Score::LOSE`] which dominate any
/// heuristic value so that forced wins and losses are never traded for a
/// better-looking estimate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score {
    value: i32,
}

impl Score {
    /// Bound that is never reached by an evaluation. Used as the initial value
    /// of alpha and beta.
    pub const INFINITY: Self = Self { value: 1_000_000 };
    /// The agent has connected its sides.
    pub const WIN: Self = Self {
        value: Self::INFINITY.value - 1,
    };
    /// The opponent has connected its sides.
    pub const LOSE: Self = Self {
        value: -Self::WIN.value,
    };

    /// Creates a heuristic score.
    ///
    /// # Panics
    ///
    /// Panics if the value falls into the range reserved for decided games.
    #[must_use]
    pub fn heuristic(value: i32) -> Self {
        assert!(
            value.abs() < Self::WIN.value,
            "heuristic score {value} collides with decided game scores"
        );
        Self { value }
    }

    /// Returns `true` if the score represents a won or lost game.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.value.abs() >= Self::WIN.value
    }

    /// Raw value of the score.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }
}

impl Neg for Score {
    type Output = Self;

    /// Mirrors evaluation to the other player's perspective.
    fn neg(self) -> Self::Output {
        Self { value: -self.value }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self >= Self::WIN {
            write!(f, "win")
        } else if *self <= Self::LOSE {
            write!(f, "loss")
        } else {
            write!(f, "cells {}", self.value)
        }
    }
}
