//! Provides a fully-specified [Hex] board representation.
//!
//! [Hex]: https://en.wikipedia.org/wiki/Hex_(board_game)

use std::fmt::{self, Write};

use anyhow::{bail, ensure};
use itertools::Itertools;

use crate::hex::connectivity;
use crate::hex::core::{Cell, Colour, BOARD_WIDTH, MAX_BOARD_WIDTH};

/// Square grid of cells, each either empty or owned by one of the players.
///
/// The board is a plain value: cloning it produces an independent copy, which
/// is what every search path and playout works on. The live game board is
/// owned by [`crate::hex::game::Game`].
///
/// The board can be serialized to and parsed from a compact notation similar
/// to FEN: rows from top to bottom separated by `/`, each row a string of `R`,
/// `B` and `.` (empty) characters.
///
/// ```
/// use hexen::hex::board::Board;
/// use hexen::hex::core::{Cell, Colour};
///
/// let board = Board::from_rows("R../.B./...").unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.tile_at(Cell::new(0, 0)), Some(Colour::Red));
/// assert_eq!(board.tile_at(Cell::new(1, 1)), Some(Colour::Blue));
/// assert_eq!(board.rows(), "R../.B./...");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    cells: Vec<Option<Colour>>,
}

impl Board {
    /// Creates an empty board of given width.
    ///
    /// # Panics
    ///
    /// Panics if the width is 0 or exceeds [`MAX_BOARD_WIDTH`].
    #[must_use]
    pub fn new(width: u8) -> Self {
        assert!(
            (1..=MAX_BOARD_WIDTH).contains(&width),
            "board width should be within 1..={MAX_BOARD_WIDTH}, got {width}"
        );
        Self {
            width,
            cells: vec![None; usize::from(width) * usize::from(width)],
        }
    }

    /// Creates an empty tournament-sized (11x11) board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(BOARD_WIDTH)
    }

    /// Parses the board from the `/`-separated row notation. An optional
    /// `board` prefix is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are not of equal length, the board is not
    /// square, is empty or larger than [`MAX_BOARD_WIDTH`], or contains
    /// characters other than `R`, `B` and `.`.
    pub fn from_rows(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix("board ").unwrap_or(input).trim();
        let rows = input.split('/').collect_vec();
        ensure!(
            !input.is_empty() && rows.len() <= usize::from(MAX_BOARD_WIDTH),
            "expected 1..={MAX_BOARD_WIDTH} rows, got {}",
            if input.is_empty() { 0 } else { rows.len() }
        );
        // Checked above.
        #[allow(clippy::cast_possible_truncation)]
        let mut board = Self::new(rows.len() as u8);
        for (x, row) in rows.iter().enumerate() {
            ensure!(
                row.chars().count() == rows.len(),
                "row {x} should have {} cells, got {}: '{row}'",
                rows.len(),
                row.chars().count()
            );
            for (y, symbol) in row.chars().enumerate() {
                let tile = match symbol {
                    'R' | 'r' => Some(Colour::Red),
                    'B' | 'b' => Some(Colour::Blue),
                    '.' | '0' => None,
                    _ => bail!("unexpected cell symbol '{symbol}' in row {x}"),
                };
                #[allow(clippy::cast_possible_truncation)]
                let cell = Cell::new(x as u8, y as u8);
                board.cells[cell.index(board.width)] = tile;
            }
        }
        Ok(board)
    }

    /// Serializes the board into the notation accepted by
    /// [`Board::from_rows`].
    #[must_use]
    pub fn rows(&self) -> String {
        self.cells
            .chunks(usize::from(self.width))
            .map(|row| row.iter().map(|&tile| symbol(tile)).collect::<String>())
            .join("/")
    }

    /// Grid dimension N.
    #[must_use]
    pub const fn size(&self) -> u8 {
        self.width
    }

    /// Returns `true` if the cell addresses a tile of this board.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x() < self.width && cell.y() < self.width
    }

    /// Returns the owner of the cell, if any.
    #[must_use]
    pub fn tile_at(&self, cell: Cell) -> Option<Colour> {
        debug_assert!(self.contains(cell), "{cell} is outside the board");
        self.cells[cell.index(self.width)]
    }

    /// Places a stone of `colour` on the cell. Callers are responsible for
    /// the cell being within the board; validation of user input lives in
    /// [`crate::hex::game::Game`].
    pub fn set_tile(&mut self, cell: Cell, colour: Colour) {
        debug_assert!(self.contains(cell), "{cell} is outside the board");
        self.cells[cell.index(self.width)] = Some(colour);
    }

    /// Removes the stone from the cell.
    pub fn clear_tile(&mut self, cell: Cell) {
        debug_assert!(self.contains(cell), "{cell} is outside the board");
        self.cells[cell.index(self.width)] = None;
    }

    /// Returns `true` if `colour` has connected its two sides of the board.
    #[must_use]
    pub fn has_ended(&self, colour: Colour) -> bool {
        connectivity::has_connected(self, colour)
    }

    /// Returns the colour that has connected its sides, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Colour> {
        connectivity::winner(self)
    }

    /// Iterates over all cells in row-major order along with their owners.
    pub fn tiles(&self) -> impl Iterator<Item = (Cell, Option<Colour>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, &tile)| (Cell::from_index(index, self.width), tile))
    }

    /// Number of stones on the board.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|tile| tile.is_some()).count()
    }

    /// Number of stones of the given colour.
    #[must_use]
    pub fn count(&self, colour: Colour) -> usize {
        self.cells
            .iter()
            .filter(|&&tile| tile == Some(colour))
            .count()
    }

    /// Returns `true` if there are no empty cells left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_rows(input)
    }
}

const fn symbol(tile: Option<Colour>) -> char {
    match tile {
        Some(Colour::Red) => 'R',
        Some(Colour::Blue) => 'B',
        None => '.',
    }
}

impl fmt::Display for Board {
    /// Draws the board as a rhombus: every next row is shifted by one
    /// character to the right.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (x, row) in self.cells.chunks(usize::from(self.width)).enumerate() {
            for _ in 0..x {
                f.write_char(' ')?;
            }
            writeln!(f, "{}", row.iter().map(|&tile| symbol(tile)).join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.rows())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty() {
        let board = Board::standard();
        assert_eq!(board.size(), 11);
        assert_eq!(board.occupied(), 0);
        assert!(!board.is_full());
        assert_eq!(board.winner(), None);
        assert_eq!(board.rows(), vec!["..........."; 11].join("/"));
    }

    #[test]
    fn clones_are_independent() {
        let mut board = Board::new(3);
        let snapshot = board.clone();
        board.set_tile(Cell::new(1, 1), Colour::Red);
        assert_eq!(board.tile_at(Cell::new(1, 1)), Some(Colour::Red));
        assert_eq!(snapshot.tile_at(Cell::new(1, 1)), None);
        assert_eq!(board.occupied(), 1);
        assert_eq!(snapshot.occupied(), 0);
    }

    #[test]
    fn parse() {
        let board = Board::try_from("board R.B/.../BRR").unwrap();
        assert_eq!(board.count(Colour::Red), 3);
        assert_eq!(board.count(Colour::Blue), 2);
        assert_eq!(board.rows(), "R.B/.../BRR");
        assert_eq!(board.to_string(), "R . B\n . . .\n  B R R\n");
    }

    #[test]
    fn parse_errors() {
        assert!(Board::from_rows("").is_err());
        assert!(Board::from_rows("R./..R").is_err());
        assert!(Board::from_rows("R../...").is_err());
        assert!(Board::from_rows("X./..").is_err());
        assert!(Board::from_rows(&vec!["."; 27].join("/")).is_err());
    }

    #[test]
    fn full() {
        let board = Board::from_rows("RB/BR").unwrap();
        assert!(board.is_full());
        assert_eq!(board.occupied(), 4);
    }

    #[test]
    #[should_panic(expected = "board width should be within 1..=26, got 0")]
    fn zero_width() {
        let _ = Board::new(0);
    }
}
