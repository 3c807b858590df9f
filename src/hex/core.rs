//! Hex primitives commonly used within [`crate::hex`].

use std::fmt;
use std::ops::Not;

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use itertools::Itertools;

/// Board width of the standard tournament Hex board.
pub const BOARD_WIDTH: u8 = 11;
/// Largest supported board. Columns are occasionally written as letters, 26
/// is the natural limit.
pub const MAX_BOARD_WIDTH: u8 = 26;

/// Hex is played between two players: Red (having the advantage of the first
/// turn) and Blue.
///
/// Red connects the top edge (row 0) to the bottom edge, Blue connects the
/// left edge (column 0) to the right edge.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Blue,
}

impl Colour {
    /// Returns the other player's colour.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Both colours, Red first.
    pub const ALL: [Self; 2] = [Self::Red, Self::Blue];
}

impl Not for Colour {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl TryFrom<&str> for Colour {
    type Error = anyhow::Error;

    fn try_from(colour: &str) -> anyhow::Result<Self> {
        match colour.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "b" | "blue" => Ok(Self::Blue),
            _ => bail!("colour should be 'red' or 'blue', got '{colour}'"),
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Red => "red",
                Self::Blue => "blue",
            }
        )
    }
}

/// Offsets of the six neighbours of a cell in `(row, column)` coordinates.
const NEIGHBOUR_OFFSETS: [(i8, i8); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// A cell of the board: `x` is the row, `y` is the column.
///
/// ```
/// use hexen::hex::core::Cell;
///
/// let cell = Cell::new(2, 7);
/// assert_eq!(cell.to_string(), "2,7");
/// assert_eq!(Cell::try_from("2,7").unwrap(), cell);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Row of the cell.
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Column of the cell.
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Row-major index of the cell on a board of given width.
    #[must_use]
    pub const fn index(self, width: u8) -> usize {
        self.x as usize * width as usize + self.y as usize
    }

    /// Inverse of [`Cell::index`].
    #[must_use]
    pub const fn from_index(index: usize, width: u8) -> Self {
        Self {
            x: (index / width as usize) as u8,
            y: (index % width as usize) as u8,
        }
    }

    /// Coordinate along the axis `colour` has to bridge: the row for Red and
    /// the column for Blue.
    #[must_use]
    pub const fn along(self, colour: Colour) -> u8 {
        match colour {
            Colour::Red => self.x,
            Colour::Blue => self.y,
        }
    }

    /// Returns the hex-adjacent cells that fit on a board of given width.
    #[must_use]
    pub fn neighbours(self, width: u8) -> ArrayVec<Self, 6> {
        let mut result = ArrayVec::new();
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let (Some(x), Some(y)) = (
                self.x.checked_add_signed(dx),
                self.y.checked_add_signed(dy),
            ) else {
                continue;
            };
            if x < width && y < width {
                result.push(Self { x, y });
            }
        }
        result
    }

    /// Returns `true` if the cell is one of the four corners of the board.
    #[must_use]
    pub const fn is_corner(self, width: u8) -> bool {
        let last = width - 1;
        (self.x == 0 || self.x == last) && (self.y == 0 || self.y == last)
    }
}

impl TryFrom<&str> for Cell {
    type Error = anyhow::Error;

    fn try_from(cell: &str) -> anyhow::Result<Self> {
        let Some((x, y)) = cell.trim().split(',').collect_tuple() else {
            bail!("cell should be 'x,y', got '{cell}'");
        };
        Ok(Self {
            x: x.trim().parse().with_context(|| format!("invalid row in '{cell}'"))?,
            y: y.trim()
                .parse()
                .with_context(|| format!("invalid column in '{cell}'"))?,
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A move is either a stone placement or the pie-rule swap, which is only
/// legal on the second turn of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Place a stone of the player to move on the cell.
    Place(Cell),
    /// Take over the opponent's opening move and colour.
    Swap,
}

impl From<Cell> for Move {
    fn from(cell: Cell) -> Self {
        Self::Place(cell)
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        match input.trim() {
            "swap" => Ok(Self::Swap),
            cell => Ok(Self::Place(Cell::try_from(cell)?)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place(cell) => write!(f, "{cell}"),
            Self::Swap => write!(f, "swap"),
        }
    }
}
