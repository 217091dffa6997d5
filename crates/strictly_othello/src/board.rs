//! Board storage and per-square stability counters.

use crate::types::{BOARD_SIZE, NUM_SQUARES, Player, Position, Score, Square};
use tracing::instrument;

/// 8x8 Othello board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Squares in row-major order (0-63).
    squares: [Square; NUM_SQUARES],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; NUM_SQUARES],
        }
    }

    /// Creates the standard starting position.
    ///
    /// White holds the `(mid-1, mid-1)` / `(mid, mid)` diagonal, Black the
    /// other one.
    pub fn starting() -> Self {
        let mid = BOARD_SIZE / 2;
        let mut board = Self::new();
        for (row, col, player) in [
            (mid - 1, mid - 1, Player::White),
            (mid, mid, Player::White),
            (mid - 1, mid, Player::Black),
            (mid, mid - 1, Player::Black),
        ] {
            if let Some(pos) = Position::new(row, col) {
                board.set(pos, Square::Occupied(player));
            }
        }
        board
    }

    /// Parses eight rows of `B`, `W` and `.` characters.
    ///
    /// Returns `None` if a row is not exactly eight recognised characters.
    #[instrument]
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Option<Self> {
        let mut board = Self::new();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != BOARD_SIZE {
                return None;
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let square = match ch {
                    'B' => Square::Occupied(Player::Black),
                    'W' => Square::Occupied(Player::White),
                    '.' => Square::Empty,
                    _ => return None,
                };
                board.set(Position::new(row, col)?, square);
            }
        }
        Some(board)
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; NUM_SQUARES] {
        &self.squares
    }

    /// Counts stones for each player.
    pub fn score(&self) -> Score {
        self.squares
            .iter()
            .fold(Score::default(), |mut score, square| {
                match square {
                    Square::Occupied(Player::Black) => score.black += 1,
                    Square::Occupied(Player::White) => score.white += 1,
                    Square::Empty => {}
                }
                score
            })
    }

    /// Number of empty squares.
    pub fn empty_count(&self) -> usize {
        NUM_SQUARES - self.score().total()
    }

    /// Flattened numeric encoding: `-1` Black, `1` White, `0` empty.
    pub fn flatten(&self) -> Vec<i8> {
        self.squares
            .iter()
            .map(|square| square.owner().map_or(0, Player::sign))
            .collect()
    }

    /// Rows as wire labels (`"BLACK"`, `"WHITE"`, `"NONE"`).
    pub fn labels(&self) -> Vec<Vec<&'static str>> {
        self.squares
            .chunks(BOARD_SIZE)
            .map(|row| row.iter().map(|square| square.label()).collect())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for (row, squares) in self.squares.chunks(BOARD_SIZE).enumerate() {
            write!(f, "{}", row)?;
            for square in squares {
                let symbol = match square {
                    Square::Empty => '.',
                    Square::Occupied(Player::Black) => 'B',
                    Square::Occupied(Player::White) => 'W',
                };
                write!(f, " {}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-square count of moves since the square last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stability {
    ages: [u32; NUM_SQUARES],
}

impl Stability {
    /// All counters at zero.
    pub fn new() -> Self {
        Self {
            ages: [0; NUM_SQUARES],
        }
    }

    /// Moves since `pos` last changed.
    pub fn age(&self, pos: Position) -> u32 {
        self.ages[pos.index()]
    }

    /// Ages every square by one move, then zeroes the `changed` squares.
    pub fn advance(&mut self, changed: &[Position]) {
        for age in self.ages.iter_mut() {
            *age = age.saturating_add(1);
        }
        for pos in changed {
            self.ages[pos.index()] = 0;
        }
    }

    /// Counters in row-major order.
    pub fn ages(&self) -> &[u32; NUM_SQUARES] {
        &self.ages
    }
}

impl Default for Stability {
    fn default() -> Self {
        Self::new()
    }
}
