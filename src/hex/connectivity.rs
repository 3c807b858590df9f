//! Answers "who has won" and "how far is each player from winning".
//!
//! A player wins Hex by connecting the two opposite sides of the board
//! assigned to their colour with an unbroken chain of hex-adjacent stones.
//! The board can never be filled without one of the players winning, but a
//! partially filled board usually has no winner yet.
//!
//! - [`has_connected`] and [`winner`] are stateless flood fills over a board
//!   snapshot.
//! - [`connection_distance`] estimates how many stones a player still needs,
//!   which is what [`crate::evaluation`] is built on.
//! - [`Connections`] tracks connected groups incrementally and is used by
//!   playouts, which query the winner after every single stone.

use std::collections::VecDeque;

use crate::hex::board::Board;
use crate::hex::core::{Cell, Colour};

/// Returns `true` if `colour` has a chain of stones linking its two sides.
#[must_use]
pub fn has_connected(board: &Board, colour: Colour) -> bool {
    let width = board.size();
    let last = width - 1;
    let mut visited = vec![false; usize::from(width) * usize::from(width)];
    let mut stack = board
        .tiles()
        .filter(|&(cell, tile)| tile == Some(colour) && cell.along(colour) == 0)
        .map(|(cell, _)| cell)
        .collect::<Vec<_>>();
    for cell in &stack {
        visited[cell.index(width)] = true;
    }
    while let Some(cell) = stack.pop() {
        if cell.along(colour) == last {
            return true;
        }
        for neighbour in cell.neighbours(width) {
            let index = neighbour.index(width);
            if !visited[index] && board.tile_at(neighbour) == Some(colour) {
                visited[index] = true;
                stack.push(neighbour);
            }
        }
    }
    false
}

/// Returns the colour which has connected its sides, if any.
#[must_use]
pub fn winner(board: &Board) -> Option<Colour> {
    Colour::ALL
        .into_iter()
        .find(|&colour| has_connected(board, colour))
}

/// Distance reported when `colour` can not connect its sides at all because
/// the opponent has cut every path. It is larger than any reachable distance
/// on a board of given width.
#[must_use]
pub const fn unreachable_distance(width: u8) -> u32 {
    width as u32 * width as u32 + 1
}

/// Estimates the number of additional stones `colour` needs to connect its
/// sides: the length of the cheapest path where own stones cost 0, empty
/// cells cost 1 and opponent stones are impassable.
///
/// Returns 0 for a connected colour and [`unreachable_distance`] when every
/// path is blocked. The estimate ignores the opponent's replies, so it never
/// overestimates the number of stones needed.
#[must_use]
pub fn connection_distance(board: &Board, colour: Colour) -> u32 {
    let width = board.size();
    let last = width - 1;
    let cost = |cell: Cell| -> Option<u32> {
        match board.tile_at(cell) {
            Some(owner) if owner == colour => Some(0),
            Some(_) => None,
            None => Some(1),
        }
    };

    // 0-1 BFS: zero-cost steps go to the front of the queue.
    let mut distances = vec![u32::MAX; usize::from(width) * usize::from(width)];
    let mut queue = VecDeque::new();
    for (cell, _) in board.tiles().filter(|&(cell, _)| cell.along(colour) == 0) {
        if let Some(step) = cost(cell) {
            distances[cell.index(width)] = step;
            if step == 0 {
                queue.push_front((cell, step));
            } else {
                queue.push_back((cell, step));
            }
        }
    }

    let mut best = unreachable_distance(width);
    while let Some((cell, distance)) = queue.pop_front() {
        if distance > distances[cell.index(width)] {
            continue;
        }
        if cell.along(colour) == last {
            best = best.min(distance);
            continue;
        }
        for neighbour in cell.neighbours(width) {
            let Some(step) = cost(neighbour) else {
                continue;
            };
            let candidate = distance + step;
            let index = neighbour.index(width);
            if candidate < distances[index] {
                distances[index] = candidate;
                if step == 0 {
                    queue.push_front((neighbour, candidate));
                } else {
                    queue.push_back((neighbour, candidate));
                }
            }
        }
    }
    best
}

bitflags::bitflags! {
    /// Sides of the board touched by a group of same-coloured stones. The
    /// sides are relative to the group's colour: top and bottom for Red, left
    /// and right for Blue.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct Edges: u8 {
        /// Row 0 for Red, column 0 for Blue.
        const START = 0b01;
        /// Last row for Red, last column for Blue.
        const END = 0b10;
    }
}

impl Edges {
    fn of(cell: Cell, colour: Colour, width: u8) -> Self {
        let mut edges = Self::empty();
        if cell.along(colour) == 0 {
            edges |= Self::START;
        }
        if cell.along(colour) == width - 1 {
            edges |= Self::END;
        }
        edges
    }
}

/// Incremental [disjoint-set] structure over the stones of a board.
///
/// Every set is a group of connected same-coloured stones; its root records
/// which of the colour's sides the group touches. Placing a stone merges it
/// with the adjacent groups of its colour and the game is won as soon as a
/// group touches both sides, so the winner is known after every stone without
/// rescanning the board.
///
/// [disjoint-set]: https://en.wikipedia.org/wiki/Disjoint-set_data_structure
#[derive(Clone, Debug)]
pub struct Connections {
    width: u8,
    parent: Vec<usize>,
    size: Vec<u16>,
    edges: Vec<Edges>,
    winner: Option<Colour>,
}

impl Connections {
    /// Builds the groups for all stones already on the board.
    #[must_use]
    pub fn new(board: &Board) -> Self {
        let width = board.size();
        let cells = usize::from(width) * usize::from(width);
        let mut connections = Self {
            width,
            parent: (0..cells).collect(),
            size: vec![1; cells],
            edges: vec![Edges::empty(); cells],
            winner: None,
        };
        for (cell, tile) in board.tiles() {
            if let Some(colour) = tile {
                connections.link(board, cell, colour);
            }
        }
        connections
    }

    /// Colour that has connected its sides, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<Colour> {
        self.winner
    }

    /// Places a stone on the board and merges it with the neighbouring groups
    /// of the same colour. Returns the winner after the placement.
    pub fn place(&mut self, board: &mut Board, cell: Cell, colour: Colour) -> Option<Colour> {
        debug_assert_eq!(board.size(), self.width);
        debug_assert!(board.tile_at(cell).is_none(), "{cell} is occupied");
        board.set_tile(cell, colour);
        self.link(board, cell, colour);
        self.winner
    }

    fn link(&mut self, board: &Board, cell: Cell, colour: Colour) {
        let index = cell.index(self.width);
        for neighbour in cell.neighbours(self.width) {
            if board.tile_at(neighbour) == Some(colour) {
                self.union(index, neighbour.index(self.width));
            }
        }
        let root = self.find(index);
        self.edges[root] |= Edges::of(cell, colour, self.width);
        if self.edges[root].is_all() && self.winner.is_none() {
            self.winner = Some(colour);
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        // Path halving.
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, lhs: usize, rhs: usize) {
        let (mut lhs, mut rhs) = (self.find(lhs), self.find(rhs));
        if lhs == rhs {
            return;
        }
        if self.size[lhs] < self.size[rhs] {
            std::mem::swap(&mut lhs, &mut rhs);
        }
        self.parent[rhs] = lhs;
        self.size[lhs] += self.size[rhs];
        let merged = self.edges[rhs];
        self.edges[lhs] |= merged;
    }
}
