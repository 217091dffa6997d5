//! Move resolution: legality and capture sets.
//!
//! Pure functions over a [`Board`]. A placement is legal when at least one
//! of the eight compass lines from the target holds an unbroken run of
//! opponent stones closed off by one of the mover's own stones.

use crate::board::Board;
use crate::types::{Player, Position, Square};
use std::collections::BTreeMap;
use tracing::instrument;

/// Compass steps, scanned in this order.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Legal targets mapped to the stones each would capture, in row-major order.
pub type LegalMoves = BTreeMap<Position, Vec<Position>>;

/// Stones captured by `player` placing at `pos`.
///
/// Ordered by direction, then by distance from `pos`. Empty when the square
/// is occupied or no line closes.
pub fn captures(board: &Board, pos: Position, player: Player) -> Vec<Position> {
    if !board.is_empty(pos) {
        return Vec::new();
    }

    let opponent = Square::Occupied(player.opponent());
    let mut flips = Vec::new();

    for (dr, dc) in DIRECTIONS {
        let mut line = Vec::new();
        let mut cursor = pos.offset(dr, dc);

        while let Some(cell) = cursor {
            if board.get(cell) != opponent {
                break;
            }
            line.push(cell);
            cursor = cell.offset(dr, dc);
        }

        let closed = cursor.is_some_and(|cell| board.get(cell) == Square::Occupied(player));
        if closed && !line.is_empty() {
            flips.extend(line);
        }
    }

    flips
}

/// Every legal move for `player` with its capture set.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, player: Player) -> LegalMoves {
    Position::all()
        .filter_map(|pos| {
            let flips = captures(board, pos, player);
            (!flips.is_empty()).then_some((pos, flips))
        })
        .collect()
}

/// Whether `player` may place at `pos`.
pub fn is_legal(board: &Board, pos: Position, player: Player) -> bool {
    !captures(board, pos, player).is_empty()
}

/// Whether `player` has any legal move at all.
pub fn has_legal_move(board: &Board, player: Player) -> bool {
    Position::all().any(|pos| is_legal(board, pos, player))
}
