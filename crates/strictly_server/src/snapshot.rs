//! JSON view of a game for the browser front end.

use serde::{Deserialize, Serialize};
use strictly_othello::{Game, MoveRecord, Position, Score};

/// `[row, col]` pair as sent on the wire.
pub type Coords = [usize; 2];

/// One applied move as shown in the move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Mover label.
    pub player: String,
    /// Target row.
    pub row: usize,
    /// Target column.
    pub col: usize,
    /// Score after the move.
    #[serde(rename = "scoreAfter")]
    pub score_after: Score,
    /// Opponent's legal move count after the move.
    #[serde(rename = "nextMovesCount")]
    pub next_moves_count: usize,
}

impl From<&MoveRecord> for HistoryEntry {
    fn from(record: &MoveRecord) -> Self {
        Self {
            player: record.player().to_string(),
            row: record.position().row(),
            col: record.position().col(),
            score_after: *record.score_after(),
            next_moves_count: *record.opponent_moves_after(),
        }
    }
}

/// Full game state returned by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// 8x8 grid of `"BLACK"`, `"WHITE"` or `"NONE"`.
    pub board: Vec<Vec<String>>,
    /// Player to move.
    pub current_player: String,
    /// Legal targets for the player to move.
    pub valid_moves: Vec<Coords>,
    /// Current stone counts.
    pub scores: Score,
    /// Applied moves, oldest first.
    pub history: Vec<HistoryEntry>,
    /// Whether the game has ended.
    pub game_over: bool,
    /// `"BLACK"`, `"WHITE"` or `"DRAW"` once the game has ended.
    pub winner: Option<String>,
    /// Target of the latest move.
    pub last_move: Option<Coords>,
    /// Stones flipped by the latest move.
    pub last_flipped: Vec<Coords>,
    /// Game identifier.
    pub game_id: String,
    /// Recent event log lines, oldest first.
    pub events: Vec<String>,
}

fn coords(position: &Position) -> Coords {
    [position.row(), position.col()]
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            board: game
                .board()
                .labels()
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
            current_player: game.to_move().to_string(),
            valid_moves: game.legal_moves().keys().map(coords).collect(),
            scores: game.score(),
            history: game.history().iter().map(HistoryEntry::from).collect(),
            game_over: game.is_over(),
            winner: game.outcome().map(|outcome| outcome.label().to_string()),
            last_move: game.last_move().as_ref().map(coords),
            last_flipped: game.last_flipped().iter().map(coords).collect(),
            game_id: game.game_id().to_string(),
            events: game.events().iter().map(ToString::to_string).collect(),
        }
    }
}
