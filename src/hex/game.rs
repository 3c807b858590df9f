//! Game record: the live board together with the turn bookkeeping needed to
//! validate moves coming from the outside world, including the pie rule.

use thiserror::Error;

use crate::hex::board::Board;
use crate::hex::core::{Cell, Colour, Move};

/// Reasons for rejecting a move sent to [`Game::make_move`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("{cell} is outside of the {size}x{size} board")]
    #[allow(missing_docs)]
    OutOfRange { cell: Cell, size: u8 },

    #[error("{0} is already occupied")]
    #[allow(missing_docs)]
    Occupied(Cell),

    /// The swap is only legal once, on the second turn of the game.
    #[error("swap is only allowed once on turn 2, got it on turn {turn}")]
    InvalidSwapContext {
        #[allow(missing_docs)]
        turn: u16,
    },

    #[error("the game is over, {0} has won")]
    #[allow(missing_docs)]
    GameOver(Colour),
}

/// Live state of a game.
///
/// Red moves first. A swap on turn 2 exchanges the players' colours: the
/// second player takes over Red together with the opening stone, the first
/// player continues as Blue. The board does not change and Blue is still the
/// one to move on turn 3.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: u16,
    to_move: Colour,
    swapped: bool,
    history: Vec<Move>,
}

impl Game {
    /// Starts a new game on an empty board of given width.
    #[must_use]
    pub fn new(width: u8) -> Self {
        Self {
            board: Board::new(width),
            turn: 1,
            to_move: Colour::Red,
            swapped: false,
            history: Vec::new(),
        }
    }

    /// Continues a game from an arbitrary position. The turn number and the
    /// side to move are derived from the stone count: Red is to move when both
    /// players have the same number of stones.
    ///
    /// # Errors
    ///
    /// Returns an error if the stone counts can not occur in a game.
    pub fn from_board(board: Board) -> anyhow::Result<Self> {
        let red = board.count(Colour::Red);
        let blue = board.count(Colour::Blue);
        let to_move = if red == blue {
            Colour::Red
        } else if red == blue + 1 {
            Colour::Blue
        } else {
            anyhow::bail!("expected Red to have as many stones as Blue or one more, got {red} and {blue}");
        };
        let turn = u16::try_from(board.occupied() + 1)?;
        Ok(Self {
            board,
            turn,
            to_move,
            swapped: false,
            history: Vec::new(),
        })
    }

    /// Validates and applies the move of the player to move.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] if the game is over, the cell is outside of the
    /// board or occupied, or the swap is requested on a turn other than 2 or
    /// for the second time.
    pub fn make_move(&mut self, next_move: Move) -> Result<(), IllegalMove> {
        if let Some(winner) = self.winner() {
            return Err(IllegalMove::GameOver(winner));
        }
        match next_move {
            Move::Swap => {
                if self.turn != 2 || self.swapped {
                    return Err(IllegalMove::InvalidSwapContext { turn: self.turn });
                }
                self.swapped = true;
            },
            Move::Place(cell) => {
                if !self.board.contains(cell) {
                    return Err(IllegalMove::OutOfRange {
                        cell,
                        size: self.board.size(),
                    });
                }
                if self.board.tile_at(cell).is_some() {
                    return Err(IllegalMove::Occupied(cell));
                }
                self.board.set_tile(cell, self.to_move);
                self.to_move = !self.to_move;
            },
        }
        self.turn += 1;
        self.history.push(next_move);
        Ok(())
    }

    /// The live board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Number of the turn about to be played, starting from 1.
    #[must_use]
    pub const fn turn(&self) -> u16 {
        self.turn
    }

    /// Colour of the stone the next placement will put on the board.
    #[must_use]
    pub const fn to_move(&self) -> Colour {
        self.to_move
    }

    /// Returns `true` if the second player has taken over the opening.
    #[must_use]
    pub const fn swapped(&self) -> bool {
        self.swapped
    }

    /// Colour currently played by the player who made the first move.
    #[must_use]
    pub const fn first_player_colour(&self) -> Colour {
        if self.swapped {
            Colour::Blue
        } else {
            Colour::Red
        }
    }

    /// The last move played, if any.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// All moves played since the game (or the position it was created from)
    /// started.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn winner(&self) -> Option<Colour> {
        self.board.winner()
    }

    /// Returns `true` if somebody has won or there are no empty cells left.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner().is_some() || self.board.is_full()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn alternating_turns() {
        let mut game = Game::new(5);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.to_move(), Colour::Red);
        game.make_move(Move::Place(Cell::new(2, 2))).unwrap();
        assert_eq!(game.turn(), 2);
        assert_eq!(game.to_move(), Colour::Blue);
        game.make_move(Move::Place(Cell::new(0, 0))).unwrap();
        assert_eq!(game.board().tile_at(Cell::new(0, 0)), Some(Colour::Blue));
        assert_eq!(game.last_move(), Some(Move::Place(Cell::new(0, 0))));
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn swap() {
        let mut game = Game::new(5);
        game.make_move(Move::Place(Cell::new(1, 3))).unwrap();
        game.make_move(Move::Swap).unwrap();
        assert!(game.swapped());
        assert_eq!(game.first_player_colour(), Colour::Blue);
        assert_eq!(game.turn(), 3);
        assert_eq!(game.to_move(), Colour::Blue);
        assert_eq!(game.board().tile_at(Cell::new(1, 3)), Some(Colour::Red));
        assert_eq!(game.board().occupied(), 1);
        assert_eq!(
            game.make_move(Move::Swap),
            Err(IllegalMove::InvalidSwapContext { turn: 3 })
        );
    }

    #[test]
    fn swap_outside_second_turn() {
        let mut game = Game::new(5);
        assert_eq!(
            game.make_move(Move::Swap),
            Err(IllegalMove::InvalidSwapContext { turn: 1 })
        );
        game.make_move(Move::Place(Cell::new(1, 3))).unwrap();
        game.make_move(Move::Place(Cell::new(2, 3))).unwrap();
        assert_eq!(
            game.make_move(Move::Swap),
            Err(IllegalMove::InvalidSwapContext { turn: 3 })
        );
    }

    #[test]
    fn invalid_cells() {
        let mut game = Game::new(3);
        assert_eq!(
            game.make_move(Move::Place(Cell::new(3, 0))),
            Err(IllegalMove::OutOfRange {
                cell: Cell::new(3, 0),
                size: 3
            })
        );
        game.make_move(Move::Place(Cell::new(0, 0))).unwrap();
        assert_eq!(
            game.make_move(Move::Place(Cell::new(0, 0))),
            Err(IllegalMove::Occupied(Cell::new(0, 0)))
        );
        assert_eq!(game.turn(), 2);
    }

    #[test]
    fn game_over() {
        let mut game = Game::from_board(Board::from_rows("RB./RB./R..").unwrap()).unwrap();
        assert_eq!(game.to_move(), Colour::Blue);
        assert!(game.is_over());
        assert_eq!(
            game.make_move(Move::Place(Cell::new(2, 2))),
            Err(IllegalMove::GameOver(Colour::Red))
        );
    }

    #[test]
    fn from_board() {
        let game = Game::from_board(Board::from_rows("R.B/.../...").unwrap()).unwrap();
        assert_eq!(game.turn(), 3);
        assert_eq!(game.to_move(), Colour::Red);
        assert!(Game::from_board(Board::from_rows("RR./.../...").unwrap()).is_err());
        assert!(Game::from_board(Board::from_rows("BB./.../...").unwrap()).is_err());
    }
}
