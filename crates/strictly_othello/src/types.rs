//! Core domain types for Othello.

use crate::error::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 8;

/// Number of squares on the board.
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Player {
    /// Black (moves first).
    Black,
    /// White (moves second).
    White,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Numeric encoding used by the feature log: `-1` Black, `1` White.
    pub fn sign(self) -> i8 {
        match self {
            Player::Black => -1,
            Player::White => 1,
        }
    }
}

/// A square on the Othello board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a player's stone.
    Occupied(Player),
}

impl Square {
    /// Wire label: `"BLACK"`, `"WHITE"` or `"NONE"`.
    pub fn label(self) -> &'static str {
        match self {
            Square::Empty => "NONE",
            Square::Occupied(Player::Black) => "BLACK",
            Square::Occupied(Player::White) => "WHITE",
        }
    }

    /// Returns the owner of this square, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }
}

/// A board coordinate, always inside the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, or `None` when off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Validates raw request coordinates.
    ///
    /// # Errors
    ///
    /// Returns `MoveError::InvalidCoordinate` for anything outside `[0, 8)`,
    /// negative values included.
    #[instrument]
    pub fn from_coords(row: i64, col: i64) -> Result<Self, MoveError> {
        let invalid = MoveError::InvalidCoordinate { row, col };
        let row = usize::try_from(row).map_err(|_| invalid.clone())?;
        let col = usize::try_from(col).map_err(|_| invalid.clone())?;
        Self::new(row, col).ok_or(invalid)
    }

    /// Creates a position from a row-major board index.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_SQUARES {
            Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
        } else {
            None
        }
    }

    /// Row index (0-7).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column index (0-7).
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major board index (0-63).
    pub fn index(self) -> usize {
        self.row() * BOARD_SIZE + self.col()
    }

    /// Steps by `(dr, dc)`, or `None` when that leaves the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as usize, col as usize)
    }

    /// All 64 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..NUM_SQUARES).filter_map(Self::from_index)
    }

    /// One of the four corners.
    pub fn is_corner(self) -> bool {
        matches!((self.row, self.col), (0 | 7, 0 | 7))
    }

    /// Diagonally adjacent to a corner.
    pub fn is_x_square(self) -> bool {
        matches!((self.row, self.col), (1 | 6, 1 | 6))
    }

    /// Orthogonally adjacent to a corner.
    pub fn is_c_square(self) -> bool {
        matches!(
            (self.row, self.col),
            (0 | 7, 1 | 6) | (1 | 6, 0 | 7)
        )
    }

    /// Two steps diagonally in from a corner.
    pub fn is_semi_corner(self) -> bool {
        matches!((self.row, self.col), (2 | 5, 2 | 5))
    }

    /// On an edge but not a corner.
    pub fn is_border(self) -> bool {
        let edge = self.row == 0 || self.row == 7 || self.col == 0 || self.col == 7;
        edge && !self.is_corner()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// Stone counts for both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    /// Black stones on the board.
    pub black: usize,
    /// White stones on the board.
    pub white: usize,
}

impl Score {
    /// Total stones on the board.
    pub fn total(&self) -> usize {
        self.black + self.white
    }

    /// The player with more stones, `None` on a tie.
    pub fn leader(&self) -> Option<Player> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player won on stone count.
    Winner(Player),
    /// Equal stone counts.
    Draw,
}

impl Outcome {
    /// Majority stone count wins; a tie is a draw.
    pub fn from_score(score: &Score) -> Self {
        match score.leader() {
            Some(player) => Outcome::Winner(player),
            None => Outcome::Draw,
        }
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Winner's sign (`-1` Black, `1` White), `0` for a draw.
    pub fn sign(&self) -> i8 {
        self.winner().map_or(0, Player::sign)
    }

    /// Wire label: `"BLACK"`, `"WHITE"` or `"DRAW"`.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Winner(Player::Black) => "BLACK",
            Outcome::Winner(Player::White) => "WHITE",
            Outcome::Draw => "DRAW",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{} wins", player),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Neither player can move.
    Finished(Outcome),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_player_labels_round_trip_through_strum() {
        assert_eq!(Player::Black.to_string(), "BLACK");
        assert_eq!(Player::from_str("WHITE").unwrap(), Player::White);
    }

    #[test]
    fn test_from_coords_rejects_negative_and_large() {
        assert_eq!(
            Position::from_coords(-99, 3),
            Err(MoveError::InvalidCoordinate { row: -99, col: 3 })
        );
        assert!(Position::from_coords(2, 8).is_err());
        assert_eq!(Position::from_coords(7, 7).unwrap().index(), 63);
    }

    #[test]
    fn test_offset_stops_at_edges() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 1), Position::new(1, 1));
        assert_eq!(Position::new(7, 7).unwrap().offset(0, 1), None);
    }

    #[test]
    fn test_positional_zones() {
        let at = |r, c| Position::new(r, c).unwrap();
        assert!(at(7, 0).is_corner());
        assert!(!at(7, 0).is_border());
        assert!(at(0, 3).is_border());
        assert!(at(6, 6).is_x_square());
        assert!(at(1, 7).is_c_square());
        assert!(at(7, 6).is_c_square());
        assert!(!at(1, 1).is_c_square());
        assert!(at(5, 2).is_semi_corner());
        assert_eq!(Position::all().filter(|p| p.is_c_square()).count(), 8);
        assert_eq!(Position::all().filter(|p| p.is_border()).count(), 24);
    }

    #[test]
    fn test_outcome_from_score() {
        let score = Score { black: 40, white: 24 };
        assert_eq!(Outcome::from_score(&score), Outcome::Winner(Player::Black));
        let tie = Score { black: 32, white: 32 };
        assert_eq!(Outcome::from_score(&tie), Outcome::Draw);
        assert_eq!(Outcome::Draw.label(), "DRAW");
        assert_eq!(Outcome::Draw.sign(), 0);
        assert_eq!(Outcome::Winner(Player::White).sign(), 1);
    }
}
