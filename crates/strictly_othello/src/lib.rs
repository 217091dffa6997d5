//! Othello game-state engine.
//!
//! Board representation, move legality and capture resolution, and a
//! [`Game`] that applies moves, resolves forced passes and game over,
//! undoes moves from an append-only history, and auto-plays through a
//! pluggable [`MoveSelector`].
//!
//! # Example
//!
//! ```
//! use strictly_othello::{Game, Player, Score, Transition};
//!
//! let mut game = Game::with_id("demo");
//! let summary = game.apply_move(2, 3)?;
//! assert_eq!(summary.transition, Transition::Continue { next: Player::White });
//! assert_eq!(game.score(), Score { black: 4, white: 1 });
//! # Ok::<(), strictly_othello::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
pub mod contracts;
mod error;
mod events;
mod game;
mod history;
pub mod invariants;
pub mod rules;
mod selector;
mod types;

pub use board::{Board, Stability};
pub use error::MoveError;
pub use events::{DEFAULT_EVENT_CAPACITY, EventLog, GameEvent};
pub use game::{Game, MoveSummary, Transition, new_game_id};
pub use history::{History, MoveRecord};
pub use rules::LegalMoves;
pub use selector::{FirstLegalMoveSelector, MoveSelector, RandomSelector};
pub use types::{BOARD_SIZE, GameStatus, NUM_SQUARES, Outcome, Player, Position, Score, Square};
