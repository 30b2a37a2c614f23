//! A running game: the board plus the input lock that serialises moves.
//!
//! Every move attempt takes the lock before it is validated. A rejected
//! attempt releases it straight away; an accepted one holds it until the
//! presentation layer reports that the move has settled via
//! [`GameSession::settle`]. Input arriving while the lock is held is dropped.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::puzzle::{Cell, Direction, Puzzle, Slide, WinCondition};
use crate::shuffle;

/// Outcome of a move attempt, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub accepted: bool,
    /// Empty position after the attempt.
    pub empty: Cell,
    /// The tile that moved, when the attempt was accepted.
    pub slide: Option<Slide>,
}

impl MoveResult {
    fn accepted(slide: Slide) -> Self {
        Self {
            accepted: true,
            empty: slide.from,
            slide: Some(slide),
        }
    }

    fn rejected(empty: Cell) -> Self {
        Self {
            accepted: false,
            empty,
            slide: None,
        }
    }
}

/// What [`GameSession::settle`] found once the lock was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// No accepted move was waiting to settle.
    Idle,
    Continue,
    Won,
}

/// A touch position in presentation coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Classifies a swipe by its dominant axis.
///
/// Displacements within twice the touch radius on both axes are taps, not
/// swipes, and so are exact diagonals.
pub fn swipe_direction(dx: f64, dy: f64, radius_x: f64, radius_y: f64) -> Option<Direction> {
    if dx.abs() <= 2.0 * radius_x && dy.abs() <= 2.0 * radius_y {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else if dy.abs() > dx.abs() {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    } else {
        None
    }
}

pub struct GameSession {
    puzzle: Puzzle,
    blocked: bool,
    settling: bool,
    touch: Option<TouchPoint>,
    win_condition: WinCondition,
    rng: StdRng,
}

impl GameSession {
    /// Creates a session and deals the first shuffled board.
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut session = Self {
            puzzle: Puzzle::solved(),
            blocked: false,
            settling: false,
            touch: None,
            win_condition: config.win_condition,
            rng,
        };
        session.new_game();
        session
    }

    /// Creates a session starting from a given board instead of a shuffle.
    pub fn with_puzzle(puzzle: Puzzle, config: &EngineConfig) -> Self {
        let mut session = Self::new(config);
        session.puzzle = puzzle;
        session
    }

    /// Deals a fresh solvable board and clears the input lock.
    pub fn new_game(&mut self) -> &Puzzle {
        self.puzzle = shuffle::shuffled(&mut self.rng);
        self.blocked = false;
        self.settling = false;
        self.touch = None;

        info!(empty = %self.puzzle.empty(), "new game");
        &self.puzzle
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn win_condition(&self) -> WinCondition {
        self.win_condition
    }

    pub fn is_won(&self) -> bool {
        self.win_condition.is_met(&self.puzzle)
    }

    /// Tries to slide the tile at `cell` into the empty slot.
    pub fn attempt_move_by_cell(&mut self, cell: Cell) -> MoveResult {
        if !self.acquire() {
            return MoveResult::rejected(self.puzzle.empty());
        }
        self.resolve(Some(cell))
    }

    /// Tries to slide the tile carrying `tile` into the empty slot.
    pub fn attempt_move_by_tile(&mut self, tile: u8) -> MoveResult {
        if !self.acquire() {
            return MoveResult::rejected(self.puzzle.empty());
        }
        let target = self.puzzle.position_of(tile);
        self.resolve(target)
    }

    /// Tries to slide the tile one step from the empty slot in `direction`.
    pub fn attempt_move_by_direction(&mut self, direction: Direction) -> MoveResult {
        if !self.acquire() {
            return MoveResult::rejected(self.puzzle.empty());
        }
        let target = self.puzzle.empty().neighbor(direction);
        self.resolve(target)
    }

    /// Releases the lock held by an accepted move and checks for a win.
    pub fn settle(&mut self) -> Settled {
        if !self.settling {
            return Settled::Idle;
        }
        self.settling = false;
        self.blocked = false;

        if self.is_won() {
            info!("puzzle solved");
            Settled::Won
        } else {
            Settled::Continue
        }
    }

    /// Starts a touch gesture, taking the lock provisionally.
    ///
    /// Returns `false` when the touch was dropped because input is blocked.
    pub fn begin_touch(&mut self, point: TouchPoint) -> bool {
        if !self.acquire() {
            return false;
        }
        self.touch = Some(point);
        true
    }

    /// Finishes a touch gesture.
    ///
    /// Returns `None` when no gesture was in progress or the displacement did
    /// not amount to a swipe; the lock is released without touching the board.
    pub fn end_touch(
        &mut self,
        point: TouchPoint,
        radius_x: f64,
        radius_y: f64,
    ) -> Option<MoveResult> {
        let start = self.touch.take()?;
        self.blocked = false;

        let dx = point.x - start.x;
        let dy = point.y - start.y;

        match swipe_direction(dx, dy, radius_x, radius_y) {
            Some(direction) => Some(self.attempt_move_by_direction(direction)),
            None => {
                debug!(dx, dy, "touch cancelled");
                None
            }
        }
    }

    fn acquire(&mut self) -> bool {
        if self.blocked {
            trace!("input dropped while blocked");
            return false;
        }
        self.blocked = true;
        true
    }

    fn resolve(&mut self, target: Option<Cell>) -> MoveResult {
        match target.and_then(|cell| self.puzzle.slide(cell)) {
            Some(slide) => {
                debug!(tile = slide.tile, from = %slide.from, to = %slide.to, "move accepted");
                self.settling = true;
                MoveResult::accepted(slide)
            }
            None => {
                debug!(?target, "move rejected");
                self.blocked = false;
                MoveResult::rejected(self.puzzle.empty())
            }
        }
    }
}
