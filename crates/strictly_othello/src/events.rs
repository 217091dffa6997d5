//! Observable game log.

use crate::types::{Outcome, Player, Position, Score};
use std::collections::VecDeque;
use tracing::info;

/// Default number of events retained.
pub const DEFAULT_EVENT_CAPACITY: usize = 8;

/// Something that happened in the game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameEvent {
    /// A fresh game began.
    #[display("New game. ID: {game_id}")]
    Started {
        /// Identifier of the new game.
        game_id: String,
    },

    /// A stone was placed.
    #[display("{player} plays {position}. Flips: {flipped}")]
    MovePlayed {
        /// Player who moved.
        player: Player,
        /// Target square.
        position: Position,
        /// Number of stones flipped.
        flipped: usize,
    },

    /// A player had no legal move and was skipped.
    #[display("{player} has no legal move and passes")]
    Passed {
        /// Player who could not move.
        player: Player,
    },

    /// Neither player can move.
    #[display("Game over: {outcome} (B:{} W:{})", score.black, score.white)]
    GameOver {
        /// Final outcome.
        outcome: Outcome,
        /// Final score.
        score: Score,
    },

    /// The most recent move was taken back.
    #[display("Undo {player} at {position}")]
    MoveUndone {
        /// Player whose move was undone.
        player: Player,
        /// Square that was emptied.
        position: Position,
    },
}

/// Bounded log of the most recent events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    events: VecDeque<GameEvent>,
    capacity: usize,
}

impl EventLog {
    /// Creates a log keeping at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an event, emitting it as a tracing event.
    pub fn push(&mut self, event: GameEvent) {
        info!(event = %event, "Game event");
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Events oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Maximum number of retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, dropping the oldest events that no longer fit.
    pub fn resize(&mut self, capacity: usize) {
        while self.events.len() > capacity {
            self.events.pop_front();
        }
        self.capacity = capacity;
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}
