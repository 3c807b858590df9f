//! Legal move generation. In Hex every empty cell is a legal move for the
//! player to move; the pie-rule swap is handled by [`crate::hex::game`] and
//! never enters the search.

use crate::hex::board::Board;
use crate::hex::core::Cell;

/// Returns every empty cell in row-major order. The order is deterministic so
/// that searches seeded with the same RNG state reproduce the same games.
///
/// The result is empty for a full board: there is no move to make and callers
/// must not start a search.
#[must_use]
pub fn legal_moves(board: &Board) -> Vec<Cell> {
    board
        .tiles()
        .filter_map(|(cell, tile)| tile.is_none().then_some(cell))
        .collect()
}
