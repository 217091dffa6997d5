//! Append-only move history.
//!
//! Each [`MoveRecord`] holds the pre-move board and stability grid needed to
//! undo the move, plus the scoring and positional features exported for
//! analysis.

use crate::board::{Board, Stability};
use crate::types::{Outcome, Player, Position, Score};
use derive_getters::Getters;

/// One applied move.
///
/// Immutable once recorded, except for the final winner which is only known
/// when the game ends.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MoveRecord {
    /// Game this move belongs to.
    pub(crate) game_id: String,
    /// Zero-based move number within the game.
    pub(crate) turn_index: usize,
    /// Player who moved.
    pub(crate) player: Player,
    /// Target square.
    pub(crate) position: Position,
    /// Stones flipped, in direction then distance order.
    pub(crate) captured: Vec<Position>,
    /// Board before the move.
    pub(crate) board_before: Board,
    /// Stability counters before the move.
    pub(crate) stability_before: Stability,
    /// Score before the move.
    pub(crate) score_before: Score,
    /// Score after the move.
    pub(crate) score_after: Score,
    /// Legal moves the mover had before moving.
    pub(crate) mobility_before: usize,
    /// Legal moves the opponent has after the move.
    pub(crate) opponent_moves_after: usize,
    /// Final game outcome, filled in when the game ends.
    pub(crate) winner: Option<Outcome>,
}

impl MoveRecord {
    /// Placed stone plus flipped stones.
    pub fn cells_changed(&self) -> usize {
        self.captured.len() + 1
    }

    /// The opponent was left without a legal move.
    pub fn forced_pass(&self) -> bool {
        self.opponent_moves_after == 0
    }
}

/// Ordered sequence of applied moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<MoveRecord>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of applied moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True before the first move.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent move.
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Records oldest first.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Iterates records oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, MoveRecord> {
        self.records.iter()
    }

    pub(crate) fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub(crate) fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    /// Labels every record with the final outcome.
    pub(crate) fn backfill_winner(&mut self, outcome: Outcome) {
        for record in &mut self.records {
            record.winner = Some(outcome);
        }
    }

    /// Drops outcome labels after the game is reopened by undo.
    pub(crate) fn clear_winner(&mut self) {
        for record in &mut self.records {
            record.winner = None;
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a MoveRecord;
    type IntoIter = std::slice::Iter<'a, MoveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
