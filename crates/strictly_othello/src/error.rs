//! Errors reported by the game engine.

use crate::types::{Player, Position};

/// Error that can occur when applying, undoing or auto-playing a move.
///
/// The first four variants are ordinary outcomes of caller input and leave
/// the game untouched. `InvariantViolation` means the engine itself is
/// inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Coordinates fall outside the 8x8 grid.
    #[display("Coordinate ({row}, {col}) is off the board")]
    InvalidCoordinate {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The cell is on the board but captures nothing for this player.
    #[display("{position} is not a legal move for {player}")]
    IllegalMove {
        /// Player to move.
        player: Player,
        /// Rejected target cell.
        position: Position,
    },

    /// The game has finished; reset before playing again.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// There is no move to undo.
    #[display("No moves to undo")]
    EmptyHistory,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// True for the internal error class, false for rejected input.
    pub fn is_internal(&self) -> bool {
        matches!(self, MoveError::InvariantViolation(_))
    }
}
