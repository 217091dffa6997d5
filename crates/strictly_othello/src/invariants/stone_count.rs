//! Stone count invariant: every move adds exactly one stone.

use super::Invariant;
use crate::Game;

/// Invariant: stones on the board equal starting stones plus moves applied.
///
/// Captures only recolor existing stones, so each record in the history
/// accounts for exactly one new stone.
pub struct StoneCountInvariant;

impl Invariant<Game> for StoneCountInvariant {
    fn holds(game: &Game) -> bool {
        game.score().total() == game.starting_stones() + game.history().len()
    }

    fn description() -> &'static str {
        "Stone count equals starting stones plus applied moves"
    }
}
