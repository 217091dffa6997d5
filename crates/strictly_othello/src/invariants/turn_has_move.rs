//! Turn invariant: an in-progress game never waits on a player who cannot move.

use super::Invariant;
use crate::{Game, GameStatus, rules};

/// Invariant: while in progress, the player to move has a legal move.
///
/// Forced passes are resolved eagerly, so the turn indicator only ever
/// rests on a player who can actually place a stone.
pub struct TurnHasMoveInvariant;

impl Invariant<Game> for TurnHasMoveInvariant {
    fn holds(game: &Game) -> bool {
        match game.status() {
            GameStatus::InProgress => rules::has_legal_move(game.board(), game.to_move()),
            GameStatus::Finished(_) => true,
        }
    }

    fn description() -> &'static str {
        "Player to move has a legal move while the game is in progress"
    }
}
