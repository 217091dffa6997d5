//! Move selection policies.
//!
//! The engine only needs a chosen target; any decision-maker that picks
//! from the legal move map can drive [`Game::play_with`](crate::Game::play_with).

use crate::board::Board;
use crate::rules::LegalMoves;
use crate::types::{Player, Position};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Chooses a move from a non-empty set of legal moves.
pub trait MoveSelector {
    /// Returns the chosen target, which must be a key of `moves`.
    fn select_move(&mut self, board: &Board, player: Player, moves: &LegalMoves)
    -> Option<Position>;
}

/// Uniform random choice among legal targets.
#[derive(Debug)]
pub struct RandomSelector<R> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MoveSelector for RandomSelector<R> {
    fn select_move(
        &mut self,
        _board: &Board,
        _player: Player,
        moves: &LegalMoves,
    ) -> Option<Position> {
        let targets: Vec<Position> = moves.keys().copied().collect();
        targets.choose(&mut self.rng).copied()
    }
}

/// Always takes the first legal target in row-major order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move(
        &mut self,
        _board: &Board,
        _player: Player,
        moves: &LegalMoves,
    ) -> Option<Position> {
        moves.keys().next().copied()
    }
}
