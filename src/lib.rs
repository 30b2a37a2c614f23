//! The 15-puzzle: a 4x4 board of sliding tiles with one empty slot.
//!
//! The crate holds the game rules only. A front end owns rendering and input
//! devices, drives a [`GameSession`] with clicks, arrow keys or swipes, and
//! animates whatever [`MoveResult`] comes back.
//!
//! ```
//! use fifteen_puzzle::{Direction, EngineConfig, GameSession, Settled};
//!
//! let config = EngineConfig { seed: Some(1), ..EngineConfig::default() };
//! let mut session = GameSession::new(&config);
//! assert!(session.puzzle().is_solvable());
//!
//! let result = session.attempt_move_by_direction(Direction::Left);
//! if result.accepted {
//!     // wait out the settle delay, then release the lock
//!     assert_ne!(session.settle(), Settled::Idle);
//! }
//! assert!(!session.is_blocked());
//! ```

pub mod config;
pub mod error;
pub mod puzzle;
pub mod session;
pub mod shuffle;

pub use config::EngineConfig;
pub use error::{BoardError, ConfigError};
pub use puzzle::{Cell, Direction, Puzzle, Slide, WinCondition, EMPTY, SIZE, TILE_COUNT};
pub use session::{swipe_direction, GameSession, MoveResult, Settled, TouchPoint};
