//! History consistency invariant: the last record matches the board.

use super::Invariant;
use crate::Game;

/// Invariant: the most recent record's post-move score is the board's score.
pub struct HistoryScoreInvariant;

impl Invariant<Game> for HistoryScoreInvariant {
    fn holds(game: &Game) -> bool {
        game.history()
            .last()
            .is_none_or(|record| *record.score_after() == game.score())
    }

    fn description() -> &'static str {
        "Last history record score matches the board"
    }
}
