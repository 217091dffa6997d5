//! Othello game engine.
//!
//! [`Game`] owns the board, stability counters, turn indicator, history and
//! event log. It is mutated only through [`Game::apply_move`],
//! [`Game::undo`], the auto-play entry points, and replaced wholesale by
//! [`Game::reset`].

use crate::board::{Board, Stability};
use crate::contracts::{Contract, MoveContract, UndoContract};
use crate::error::MoveError;
use crate::events::{DEFAULT_EVENT_CAPACITY, EventLog, GameEvent};
use crate::history::{History, MoveRecord};
use crate::rules::{self, LegalMoves};
use crate::selector::{MoveSelector, RandomSelector};
use crate::types::{GameStatus, Outcome, Player, Position, Score, Square};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, warn};

/// How the turn was resolved after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The opponent moves next.
    Continue {
        /// Player to move.
        next: Player,
    },
    /// The opponent had no legal move; the turn stays put.
    ForcedPass {
        /// Player who could not move.
        passed: Player,
        /// Player to move.
        next: Player,
    },
    /// Neither player can move.
    Finished(Outcome),
}

/// Result of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    /// Player who moved.
    pub player: Player,
    /// Target square.
    pub position: Position,
    /// Stones flipped.
    pub captured: Vec<Position>,
    /// Turn resolution after the move.
    pub transition: Transition,
}

/// An Othello game.
#[derive(Debug, Clone)]
pub struct Game {
    game_id: String,
    board: Board,
    stability: Stability,
    to_move: Player,
    status: GameStatus,
    history: History,
    events: EventLog,
    starting_stones: usize,
}

// ─────────────────────────────────────────────────────────────
//  Construction
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Creates a new game identified by the current local time.
    #[instrument]
    pub fn new() -> Self {
        Self::with_id(new_game_id())
    }

    /// Creates a new game from the standard starting position.
    #[instrument(skip_all, fields(game_id))]
    pub fn with_id(game_id: impl Into<String>) -> Self {
        Self::from_board(game_id, Board::starting(), Player::Black)
    }

    /// Creates a game from an arbitrary position.
    ///
    /// Undoing every move returns to this position rather than the
    /// standard start. [`Game::reset`] always returns to the standard start.
    #[instrument(skip_all, fields(to_move = %to_move))]
    pub fn from_board(game_id: impl Into<String>, board: Board, to_move: Player) -> Self {
        let game_id = game_id.into();
        let mut events = EventLog::with_capacity(DEFAULT_EVENT_CAPACITY);
        events.push(GameEvent::Started {
            game_id: game_id.clone(),
        });
        Self {
            game_id,
            starting_stones: board.score().total(),
            board,
            stability: Stability::new(),
            to_move,
            status: GameStatus::InProgress,
            history: History::new(),
            events,
        }
    }

    /// Keeps at most `capacity` recent events.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.events.resize(capacity);
        self
    }

    /// Plays `moves` in order from the standard start.
    ///
    /// # Errors
    ///
    /// Returns the first rejected move's error.
    #[instrument(skip(moves), fields(count = moves.len()))]
    pub fn replay(moves: &[Position]) -> Result<Self, MoveError> {
        let mut game = Self::with_id("replay");
        for position in moves {
            game.apply_at(*position)?;
        }
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────
//  Accessors
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Identifier of this game.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current stability counters.
    pub fn stability(&self) -> &Stability {
        &self.stability
    }

    /// Player whose move is next.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True once neither player can move.
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Finished(_))
    }

    /// Final outcome, once finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            GameStatus::InProgress => None,
            GameStatus::Finished(outcome) => Some(outcome),
        }
    }

    /// Applied moves, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Recent game events.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Current stone counts.
    pub fn score(&self) -> Score {
        self.board.score()
    }

    /// Stones on the board before the first move.
    pub fn starting_stones(&self) -> usize {
        self.starting_stones
    }

    /// Legal moves for the player to move.
    pub fn legal_moves(&self) -> LegalMoves {
        rules::legal_moves(&self.board, self.to_move)
    }

    /// Target of the most recent move.
    pub fn last_move(&self) -> Option<Position> {
        self.history.last().map(|record| *record.position())
    }

    /// Stones flipped by the most recent move.
    pub fn last_flipped(&self) -> &[Position] {
        self.history
            .last()
            .map_or(&[], |record| record.captured().as_slice())
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions
// ─────────────────────────────────────────────────────────────

impl Game {
    /// Places a stone for the player to move at `(row, col)`.
    ///
    /// # Errors
    ///
    /// - `GameAlreadyOver` once the game has finished
    /// - `InvalidCoordinate` outside the 8x8 grid
    /// - `IllegalMove` if the placement captures nothing
    ///
    /// None of these change the game.
    #[instrument(skip(self), fields(game_id = %self.game_id, player = %self.to_move))]
    pub fn apply_move(&mut self, row: i64, col: i64) -> Result<MoveSummary, MoveError> {
        if self.is_over() {
            debug!("Rejected move on finished game");
            return Err(MoveError::GameAlreadyOver);
        }
        let position = Position::from_coords(row, col)?;
        self.apply_at(position)
    }

    fn apply_at(&mut self, position: Position) -> Result<MoveSummary, MoveError> {
        MoveContract::pre(self, &position)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let player = self.to_move;
        let mobility_before = rules::legal_moves(&self.board, player).len();
        let captured = rules::captures(&self.board, position, player);

        let board_before = self.board;
        let stability_before = self.stability;
        let score_before = self.board.score();

        self.board.set(position, Square::Occupied(player));
        for cell in &captured {
            self.board.set(*cell, Square::Occupied(player));
        }

        let mut changed = captured.clone();
        changed.push(position);
        self.stability.advance(&changed);

        let opponent_moves_after = rules::legal_moves(&self.board, player.opponent()).len();

        self.history.push(MoveRecord {
            game_id: self.game_id.clone(),
            turn_index: self.history.len(),
            player,
            position,
            captured: captured.clone(),
            board_before,
            stability_before,
            score_before,
            score_after: self.board.score(),
            mobility_before,
            opponent_moves_after,
            winner: None,
        });
        self.events.push(GameEvent::MovePlayed {
            player,
            position,
            flipped: captured.len(),
        });

        let transition = self.resolve_turn(player);

        #[cfg(debug_assertions)]
        MoveContract::post(&before, self)?;

        Ok(MoveSummary {
            player,
            position,
            captured,
            transition,
        })
    }

    /// Decides who moves after `last_mover`, passing or finishing as needed.
    fn resolve_turn(&mut self, last_mover: Player) -> Transition {
        let opponent = last_mover.opponent();

        if rules::has_legal_move(&self.board, opponent) {
            self.to_move = opponent;
            return Transition::Continue { next: opponent };
        }

        if rules::has_legal_move(&self.board, last_mover) {
            self.to_move = last_mover;
            self.events.push(GameEvent::Passed { player: opponent });
            return Transition::ForcedPass {
                passed: opponent,
                next: last_mover,
            };
        }

        Transition::Finished(self.finish())
    }

    fn finish(&mut self) -> Outcome {
        let score = self.board.score();
        let outcome = Outcome::from_score(&score);
        self.status = GameStatus::Finished(outcome);
        self.history.backfill_winner(outcome);
        self.events.push(GameEvent::GameOver { outcome, score });
        outcome
    }

    /// Takes back the most recent move.
    ///
    /// The turn is re-derived from the restored position: it goes to the
    /// opponent of the previous mover when they can move, otherwise back to
    /// the previous mover. Undo always reopens a finished game.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHistory` when there is nothing to undo.
    #[instrument(skip(self), fields(game_id = %self.game_id, moves = self.history.len()))]
    pub fn undo(&mut self) -> Result<MoveRecord, MoveError> {
        UndoContract::pre(self, &())?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let record = self.history.pop().ok_or(MoveError::EmptyHistory)?;

        self.board = record.board_before;
        self.stability = record.stability_before;
        self.to_move = match self.history.last() {
            None => record.player,
            Some(previous) => {
                let natural = previous.player.opponent();
                if rules::has_legal_move(&self.board, natural) {
                    natural
                } else {
                    previous.player
                }
            }
        };

        if self.is_over() {
            self.history.clear_winner();
        }
        self.status = GameStatus::InProgress;

        self.events.push(GameEvent::MoveUndone {
            player: record.player,
            position: record.position,
        });

        #[cfg(debug_assertions)]
        UndoContract::post(&before, self)?;

        Ok(record)
    }

    /// Plays a uniformly random legal move for the player to move.
    ///
    /// When that player has no legal move the turn is passed to the
    /// opponent, or the game ends if the opponent cannot move either.
    ///
    /// # Errors
    ///
    /// Returns `GameAlreadyOver` once the game has finished.
    #[instrument(skip(self, rng), fields(game_id = %self.game_id, player = %self.to_move))]
    pub fn play_random_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Transition, MoveError> {
        self.play_with(&mut RandomSelector::new(rng))
    }

    /// Lets `selector` choose the move for the player to move.
    ///
    /// Pass and game-over resolution is identical to
    /// [`Game::play_random_move`].
    ///
    /// # Errors
    ///
    /// Returns `GameAlreadyOver` once the game has finished, and
    /// `InvariantViolation` if the selector declines to move while legal
    /// moves exist.
    #[instrument(skip(self, selector), fields(game_id = %self.game_id, player = %self.to_move))]
    pub fn play_with<S: MoveSelector + ?Sized>(
        &mut self,
        selector: &mut S,
    ) -> Result<Transition, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }

        let moves = self.legal_moves();
        if moves.is_empty() {
            debug!("No legal move for player to move, resolving pass");
            return Ok(self.resolve_turn(self.to_move.opponent()));
        }

        let position = selector
            .select_move(&self.board, self.to_move, &moves)
            .ok_or_else(|| {
                warn!("Selector returned no move while legal moves exist");
                MoveError::InvariantViolation(
                    "Move selector declined to move while legal moves exist".to_string(),
                )
            })?;

        Ok(self.apply_at(position)?.transition)
    }

    /// Starts over from the standard position under a fresh game id.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn reset(&mut self) {
        let capacity = self.events.capacity();
        *self = Self::new().with_event_capacity(capacity);
    }

    #[cfg(test)]
    pub(crate) fn corrupt_square_for_test(&mut self, row: usize, col: usize) {
        if let Some(pos) = Position::new(row, col) {
            self.board.set(pos, Square::Occupied(Player::White));
        }
    }
}

static GAME_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Local timestamp id with a process-wide sequence suffix.
///
/// Ids sort by creation time and never repeat within a process, even for
/// games created in the same millisecond.
pub fn new_game_id() -> String {
    let sequence = GAME_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{}_{:04}",
        chrono::Local::now().format("%Y%m%d_%H%M%S_%3f"),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::FirstLegalMoveSelector;

    fn at(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    /// Black to move; after Black takes (0,2) White is left without a move.
    fn forced_pass_board() -> Board {
        Board::from_rows([
            "BW......",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "BBBBBBW.",
        ])
        .unwrap()
    }

    #[test]
    fn test_new_game_state() {
        let game = Game::with_id("g");
        assert_eq!(game.to_move(), Player::Black);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.history().is_empty());
        assert_eq!(game.score(), Score { black: 2, white: 2 });
        assert_eq!(game.legal_moves().len(), 4);
        assert_eq!(game.last_move(), None);
        assert!(game.last_flipped().is_empty());
    }

    #[test]
    fn test_opening_move_flips_one() {
        let mut game = Game::with_id("g");
        let summary = game.apply_move(2, 3).unwrap();

        assert_eq!(summary.captured, vec![at(3, 3)]);
        assert_eq!(summary.transition, Transition::Continue { next: Player::White });
        assert_eq!(game.score(), Score { black: 4, white: 1 });
        assert_eq!(game.to_move(), Player::White);
        assert_eq!(game.last_move(), Some(at(2, 3)));
        assert_eq!(game.last_flipped(), &[at(3, 3)]);
    }

    #[test]
    fn test_record_contents() {
        let mut game = Game::with_id("g");
        game.apply_move(2, 3).unwrap();
        let record = game.history().last().unwrap();

        assert_eq!(record.game_id(), "g");
        assert_eq!(*record.turn_index(), 0);
        assert_eq!(*record.player(), Player::Black);
        assert_eq!(*record.board_before(), Board::starting());
        assert_eq!(*record.score_before(), Score { black: 2, white: 2 });
        assert_eq!(*record.score_after(), Score { black: 4, white: 1 });
        assert_eq!(*record.mobility_before(), 4);
        assert_eq!(*record.opponent_moves_after(), 3);
        assert_eq!(record.cells_changed(), 2);
        assert!(!record.forced_pass());
        assert_eq!(*record.winner(), None);
    }

    #[test]
    fn test_stability_resets_changed_cells() {
        let mut game = Game::with_id("g");
        game.apply_move(2, 3).unwrap();
        game.apply_move(2, 2).unwrap();

        let stability = game.stability();
        assert_eq!(stability.age(at(2, 2)), 0);
        assert_eq!(stability.age(at(3, 3)), 0);
        assert_eq!(stability.age(at(2, 3)), 1);
        assert_eq!(stability.age(at(0, 0)), 2);
    }

    #[test]
    fn test_illegal_move_leaves_game_unchanged() {
        let mut game = Game::with_id("g");
        let before = game.clone();

        assert_eq!(
            game.apply_move(0, 0),
            Err(MoveError::IllegalMove {
                player: Player::Black,
                position: at(0, 0),
            })
        );
        assert_eq!(
            game.apply_move(-99, -99),
            Err(MoveError::InvalidCoordinate { row: -99, col: -99 })
        );
        assert!(game.apply_move(3, 8).is_err());
        assert!(game.apply_move(3, 3).is_err());

        assert_eq!(game.board(), before.board());
        assert_eq!(game.to_move(), before.to_move());
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_forced_pass_keeps_turn_and_is_logged() {
        let mut game = Game::from_board("pass", forced_pass_board(), Player::Black);
        let summary = game.apply_move(0, 2).unwrap();

        assert_eq!(
            summary.transition,
            Transition::ForcedPass {
                passed: Player::White,
                next: Player::Black,
            }
        );
        assert_eq!(game.to_move(), Player::Black);
        assert!(!game.is_over());
        assert!(game.history().last().unwrap().forced_pass());
        assert!(
            game.events()
                .iter()
                .any(|e| *e == GameEvent::Passed { player: Player::White })
        );
    }

    #[test]
    fn test_game_over_backfills_winner() {
        let mut game = Game::from_board("end", forced_pass_board(), Player::Black);
        game.apply_move(0, 2).unwrap();
        let summary = game.apply_move(7, 7).unwrap();

        let outcome = Outcome::Winner(Player::Black);
        assert_eq!(summary.transition, Transition::Finished(outcome));
        assert_eq!(game.outcome(), Some(outcome));
        assert!(
            game.history()
                .iter()
                .all(|record| *record.winner() == Some(outcome))
        );
        assert_eq!(game.apply_move(1, 1), Err(MoveError::GameAlreadyOver));
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_undo_across_forced_pass() {
        let mut game = Game::from_board("undo", forced_pass_board(), Player::Black);
        let start_board = *game.board();
        game.apply_move(0, 2).unwrap();
        let after_first = (*game.board(), *game.stability(), game.to_move());
        game.apply_move(7, 7).unwrap();
        assert!(game.is_over());

        game.undo().unwrap();
        assert_eq!((*game.board(), *game.stability(), game.to_move()), after_first);
        assert_eq!(game.to_move(), Player::Black);
        assert!(!game.is_over());
        assert!(game.history().iter().all(|record| record.winner().is_none()));

        game.undo().unwrap();
        assert_eq!(*game.board(), start_board);
        assert_eq!(game.to_move(), Player::Black);
        assert_eq!(game.undo(), Err(MoveError::EmptyHistory));
    }

    #[test]
    fn test_undo_restores_opening() {
        let mut game = Game::with_id("g");
        game.apply_move(2, 3).unwrap();
        let record = game.undo().unwrap();

        assert_eq!(*record.position(), at(2, 3));
        assert_eq!(*game.board(), Board::starting());
        assert_eq!(*game.stability(), Stability::new());
        assert_eq!(game.to_move(), Player::Black);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_random_move_passes_when_stuck() {
        // White cannot move here but Black can.
        let mut game = Game::from_board("stuck", forced_pass_board(), Player::White);
        let mut selector = FirstLegalMoveSelector;
        let transition = game.play_with(&mut selector).unwrap();

        assert_eq!(
            transition,
            Transition::ForcedPass {
                passed: Player::White,
                next: Player::Black,
            }
        );
        assert_eq!(game.to_move(), Player::Black);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_random_move_finishes_when_nobody_can_move() {
        let board = Board::from_rows([
            "BB......",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        let mut game = Game::from_board("done", board, Player::White);
        let transition = game.play_with(&mut FirstLegalMoveSelector).unwrap();

        assert_eq!(transition, Transition::Finished(Outcome::Winner(Player::Black)));
        assert!(game.is_over());
        assert_eq!(
            game.play_with(&mut FirstLegalMoveSelector),
            Err(MoveError::GameAlreadyOver)
        );
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut game = Game::with_id("g");
        game.apply_move(2, 3).unwrap();
        game.apply_move(2, 2).unwrap();
        game.reset();

        assert_eq!(*game.board(), Board::starting());
        assert_eq!(*game.stability(), Stability::new());
        assert!(game.history().is_empty());
        assert_eq!(game.to_move(), Player::Black);
        assert!(!game.is_over());
        assert_ne!(game.game_id(), "g");
    }

    #[test]
    fn test_game_ids_differ_within_one_millisecond() {
        let ids: Vec<String> = (0..50).map(|_| Game::new().game_id().to_string()).collect();
        let unique: std::collections::BTreeSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());

        let mut game = Game::new();
        let before = game.game_id().to_string();
        game.reset();
        assert_ne!(game.game_id(), before);
    }

    #[test]
    fn test_replay() {
        let game = Game::replay(&[at(2, 3), at(2, 2), at(3, 2)]).unwrap();
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.to_move(), Player::White);

        let err = Game::replay(&[at(2, 3), at(2, 3)]).unwrap_err();
        assert!(matches!(err, MoveError::IllegalMove { .. }));
    }
}
