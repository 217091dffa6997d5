//! Contract-based validation for Othello moves.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use crate::error::MoveError;
use crate::invariants::{InvariantSet, InvariantViolation, OthelloInvariants};
use crate::types::Position;
use crate::{Game, rules};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game must still be in progress.
pub struct GameInProgress;

impl GameInProgress {
    /// Rejects any action on a finished game.
    #[instrument(skip(game))]
    pub fn check(game: &Game) -> Result<(), MoveError> {
        if game.is_over() {
            Err(MoveError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the placement captures at least one stone.
pub struct CapturesStones;

impl CapturesStones {
    /// Rejects placements that flip nothing for the player to move.
    #[instrument(skip(game))]
    pub fn check(position: &Position, game: &Game) -> Result<(), MoveError> {
        if rules::is_legal(game.board(), *position, game.to_move()) {
            Ok(())
        } else {
            Err(MoveError::IllegalMove {
                player: game.to_move(),
                position: *position,
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for placing a stone.
///
/// Preconditions:
/// - Game is in progress
/// - Placement captures at least one stone
///
/// Postconditions:
/// - Exactly one record was appended
/// - All Othello invariants hold
pub struct MoveContract;

impl Contract<Game, Position> for MoveContract {
    fn pre(game: &Game, position: &Position) -> Result<(), MoveError> {
        GameInProgress::check(game)?;
        CapturesStones::check(position, game)
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        if after.history().len() != before.history().len() + 1 {
            warn!(
                before = before.history().len(),
                after = after.history().len(),
                "Move did not append exactly one record"
            );
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: move must append one history record".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Contract for taking back the latest move.
pub struct UndoContract;

impl Contract<Game, ()> for UndoContract {
    fn pre(game: &Game, _action: &()) -> Result<(), MoveError> {
        if game.history().is_empty() {
            Err(MoveError::EmptyHistory)
        } else {
            Ok(())
        }
    }

    fn post(before: &Game, after: &Game) -> Result<(), MoveError> {
        if after.history().len() + 1 != before.history().len() || after.is_over() {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: undo must pop one record and reopen the game".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Verifies the full invariant set, folding violations into one error.
#[instrument(skip(game))]
pub fn check_invariants(game: &Game) -> Result<(), MoveError> {
    OthelloInvariants::check_all(game).map_err(|violations| {
        warn!(count = violations.len(), "Invariant violations detected");
        MoveError::InvariantViolation(format!(
            "Postcondition failed: {}",
            describe(&violations)
        ))
    })
}

fn describe(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(|v| v.description.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
