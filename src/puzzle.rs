use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BoardError;
use crate::shuffle;

/// Width and height of the board.
pub const SIZE: usize = 4;
/// Number of cells on the board, the empty slot included.
pub const TILE_COUNT: usize = SIZE * SIZE;
/// Tile value standing for the empty slot.
pub const EMPTY: u8 = 16;

/// A direction the empty slot looks in for a tile to pull in.
///
/// `Left` selects the tile to the left of the empty slot, which then slides
/// right into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Row/column delta from the empty slot to the candidate tile.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        write!(f, "{}", s)
    }
}

/// A grid coordinate. Row 0 is the top, column 0 is the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell at a row-major index.
    pub const fn from_index(index: usize) -> Self {
        Self {
            row: index / SIZE,
            col: index % SIZE,
        }
    }

    /// Row-major index of this cell.
    pub const fn index(&self) -> usize {
        self.row * SIZE + self.col
    }

    pub const fn in_bounds(&self) -> bool {
        self.row < SIZE && self.col < SIZE
    }

    /// The cell one step away in `direction`, if it is still on the board.
    pub fn neighbor(&self, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.as_offset();

        let row = self.row as isize + dr;
        let col = self.col as isize + dc;

        if row >= 0 && row < SIZE as isize && col >= 0 && col < SIZE as isize {
            Some(Cell::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// True when `other` is exactly one orthogonal step away.
    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A tile that slid into the empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Value of the tile that moved.
    pub tile: u8,
    /// Cell the tile left; this is the new empty position.
    pub from: Cell,
    /// Cell the tile now occupies; this was the empty position.
    pub to: Cell,
}

/// Rule used to decide whether a board counts as won.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinCondition {
    /// Numbered tiles read 1..=15 in order; the empty slot may sit anywhere.
    #[default]
    Ordered,
    /// Numbered tiles in order and the empty slot in the last cell.
    Classic,
}

impl WinCondition {
    pub fn is_met(&self, puzzle: &Puzzle) -> bool {
        match self {
            WinCondition::Ordered => puzzle.is_won(),
            WinCondition::Classic => puzzle.is_solved(),
        }
    }
}

/// The 4x4 board together with the tracked empty position.
///
/// Invariant: `board[empty] == EMPTY`, and the board holds each value in
/// `1..=16` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    board: [[u8; SIZE]; SIZE],
    empty: Cell,
}

impl Puzzle {
    /// The ordered board with the empty slot in the bottom-right cell.
    pub fn solved() -> Self {
        let mut board = [[0; SIZE]; SIZE];
        let mut value = 1;

        for row in board.iter_mut() {
            for slot in row.iter_mut() {
                *slot = value;
                value += 1;
            }
        }

        Self {
            board,
            empty: Cell::new(SIZE - 1, SIZE - 1),
        }
    }

    /// Builds a board from a row-major sequence of tile values.
    pub fn from_values(values: [u8; TILE_COUNT]) -> Result<Self, BoardError> {
        let mut seen = [false; TILE_COUNT];
        let mut board = [[0; SIZE]; SIZE];
        let mut empty = Cell::new(0, 0);

        for (i, &value) in values.iter().enumerate() {
            if value == 0 || value as usize > TILE_COUNT {
                return Err(BoardError::OutOfRange(value));
            }
            if std::mem::replace(&mut seen[value as usize - 1], true) {
                return Err(BoardError::Duplicate(value));
            }

            let cell = Cell::from_index(i);
            board[cell.row][cell.col] = value;
            if value == EMPTY {
                empty = cell;
            }
        }

        Ok(Self { board, empty })
    }

    /// Flattened row-major copy of the board.
    pub fn values(&self) -> [u8; TILE_COUNT] {
        let mut flattened = [0; TILE_COUNT];
        for (slot, &value) in flattened.iter_mut().zip(self.board.iter().flatten()) {
            *slot = value;
        }
        flattened
    }

    /// Tile value at `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is off the board.
    pub fn tile(&self, cell: Cell) -> u8 {
        self.board[cell.row][cell.col]
    }

    pub fn empty(&self) -> Cell {
        self.empty
    }

    /// Scans the board for `tile` and returns its current cell.
    pub fn position_of(&self, tile: u8) -> Option<Cell> {
        self.board
            .iter()
            .flatten()
            .position(|&value| value == tile)
            .map(Cell::from_index)
    }

    /// Slides the tile at `target` into the empty slot.
    ///
    /// Returns `None` and leaves the board untouched when `target` is off the
    /// board or not orthogonally adjacent to the empty slot.
    pub fn slide(&mut self, target: Cell) -> Option<Slide> {
        if !target.in_bounds() || !self.empty.is_adjacent(target) {
            return None;
        }
        Some(self.swap_with_empty(target))
    }

    /// Slides the tile found one step from the empty slot in `direction`.
    pub fn apply_move(&mut self, direction: Direction) -> Option<Slide> {
        let target = self.empty.neighbor(direction)?;
        self.slide(target)
    }

    // Callers have already checked adjacency.
    fn swap_with_empty(&mut self, cell: Cell) -> Slide {
        debug_assert!(self.empty.is_adjacent(cell));

        let to = self.empty;
        let tile = self.board[cell.row][cell.col];

        self.board[to.row][to.col] = tile;
        self.board[cell.row][cell.col] = EMPTY;
        self.empty = cell;

        Slide {
            tile,
            from: cell,
            to,
        }
    }

    /// True when the numbered tiles read 1, 2, ..., 15 left-to-right,
    /// top-to-bottom. The empty slot is skipped wherever it sits.
    pub fn is_won(&self) -> bool {
        let mut prev = 0;

        for value in self.board.iter().flatten().copied() {
            if value == EMPTY {
                continue;
            }
            if value != prev + 1 {
                return false;
            }
            prev = value;
        }

        true
    }

    /// True only for the fully ordered board with the empty slot last.
    pub fn is_solved(&self) -> bool {
        let mut expected = 1;

        for value in self.board.iter().flatten().copied() {
            if value != expected {
                return false;
            }
            expected += 1;
        }

        true
    }

    pub fn is_solvable(&self) -> bool {
        shuffle::is_solvable(&self.values())
    }
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for &val in row {
                if val == EMPTY {
                    write!(f, "   ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
