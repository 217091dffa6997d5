//! Row-per-move CSV export of a game's history.
//!
//! Each row carries the move's positional, scoring and outcome features plus
//! the pre-move board and stability grids, flattened row-major into
//! bracketed lists (`"[0, 0, -1, ...]"`).

use derive_more::{Display, Error};
use serde::Serialize;
use std::fmt::Display as FmtDisplay;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use strictly_othello::{Game, MoveRecord};
use tracing::{debug, info, instrument};

/// One exported move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Game identifier.
    pub game_id: String,
    /// Zero-based move number.
    pub game_turn_idx: usize,
    /// Mover sign: `-1` Black, `1` White.
    pub player: i8,
    /// Target row.
    pub move_r: usize,
    /// Target column.
    pub move_c: usize,
    /// Target is a corner.
    pub is_corner: bool,
    /// Target is on the outer edge.
    pub is_border: bool,
    /// Target is two steps diagonally in from a corner.
    pub is_semi: bool,
    /// Target is diagonally adjacent to a corner.
    pub is_x_square: bool,
    /// Target is orthogonally adjacent to a corner.
    pub is_c_square: bool,
    /// Black stones before the move.
    pub score_pre_b: usize,
    /// White stones before the move.
    pub score_pre_w: usize,
    /// Mover's legal move count before the move.
    pub mobility_pre: usize,
    /// Placed plus flipped stones.
    pub cells_changed: usize,
    /// Board before the move, `-1`/`0`/`1` per square.
    pub board_state: String,
    /// Stability ages before the move.
    pub stability_state: String,
    /// Mover label.
    pub player_color: String,
    /// Black stones after the move.
    pub score_post_b: usize,
    /// White stones after the move.
    pub score_post_w: usize,
    /// Opponent's legal move count after the move.
    pub mobility_foe_after: usize,
    /// The opponent was left without a move.
    pub forced_pass: bool,
    /// Winner sign (`-1`, `1`, `0` for a draw), empty while the game is running.
    pub game_winner: Option<i8>,
}

impl From<&MoveRecord> for ExportRow {
    fn from(record: &MoveRecord) -> Self {
        let position = *record.position();
        Self {
            game_id: record.game_id().clone(),
            game_turn_idx: *record.turn_index(),
            player: record.player().sign(),
            move_r: position.row(),
            move_c: position.col(),
            is_corner: position.is_corner(),
            is_border: position.is_border(),
            is_semi: position.is_semi_corner(),
            is_x_square: position.is_x_square(),
            is_c_square: position.is_c_square(),
            score_pre_b: record.score_before().black,
            score_pre_w: record.score_before().white,
            mobility_pre: *record.mobility_before(),
            cells_changed: record.cells_changed(),
            board_state: list_cell(record.board_before().flatten()),
            stability_state: list_cell(record.stability_before().ages()),
            player_color: record.player().to_string(),
            score_post_b: record.score_after().black,
            score_post_w: record.score_after().white,
            mobility_foe_after: *record.opponent_moves_after(),
            forced_pass: record.forced_pass(),
            game_winner: record.winner().map(|outcome| outcome.sign()),
        }
    }
}

/// Renders values as a bracketed list: `[a, b, c]`.
fn list_cell<T: FmtDisplay>(values: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// Export error with source location.
#[derive(Debug, Clone, Display, Error)]
#[display("Export error: {} at {}:{}", message, file, line)]
pub struct ExportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ExportError {
    /// Creates a new export error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Writes the header and one row per move. Returns the row count.
#[instrument(skip(game, writer), fields(game_id = %game.game_id()))]
pub fn write_history<W: Write>(game: &Game, writer: W) -> Result<usize, ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for record in game.history() {
        out.serialize(ExportRow::from(record))
            .map_err(|e| ExportError::new(format!("Failed to write row: {}", e)))?;
        rows += 1;
    }
    out.flush()
        .map_err(|e| ExportError::new(format!("Failed to flush CSV: {}", e)))?;
    debug!(rows, "History written");
    Ok(rows)
}

/// File name used for a game's export.
pub fn export_file_name(prefix: &str, game_id: &str) -> String {
    format!("{}{}.csv", prefix, game_id)
}

/// Exports `game` to `{dir}/{prefix}{game_id}.csv`, creating `dir` if needed.
///
/// Returns `None` without touching the filesystem when no move was played.
#[instrument(skip(game, dir), fields(game_id = %game.game_id(), dir = %dir.as_ref().display()))]
pub fn export_game(
    game: &Game,
    dir: impl AsRef<Path>,
    prefix: &str,
) -> Result<Option<(PathBuf, usize)>, ExportError> {
    if game.history().is_empty() {
        debug!("Nothing to export");
        return Ok(None);
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| {
        ExportError::new(format!(
            "Failed to create export directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let path = dir.join(export_file_name(prefix, game.game_id()));
    let file = File::create(&path)
        .map_err(|e| ExportError::new(format!("Failed to create {}: {}", path.display(), e)))?;
    let rows = write_history(game, file)?;

    info!(path = %path.display(), rows, "Game exported");
    Ok(Some((path, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_features_for_opening_move() {
        let mut game = Game::with_id("row");
        game.apply_move(2, 3).unwrap();
        let row = ExportRow::from(game.history().last().unwrap());

        assert_eq!(row.game_turn_idx, 0);
        assert_eq!(row.player, -1);
        assert_eq!(row.player_color, "BLACK");
        assert_eq!((row.move_r, row.move_c), (2, 3));
        assert!(!row.is_corner);
        assert!(!row.is_border);
        assert_eq!((row.score_pre_b, row.score_pre_w), (2, 2));
        assert_eq!((row.score_post_b, row.score_post_w), (4, 1));
        assert_eq!(row.mobility_pre, 4);
        assert_eq!(row.cells_changed, 2);
        assert_eq!(row.mobility_foe_after, 3);
        assert!(!row.forced_pass);
        assert_eq!(row.game_winner, None);
    }

    #[test]
    fn test_state_columns_hold_pre_move_grids() {
        let mut game = Game::with_id("state");
        game.apply_move(2, 3).unwrap();
        game.apply_move(2, 2).unwrap();
        let row = ExportRow::from(&game.history().records()[1]);

        let mut cells = vec!["0"; 64];
        for index in [19, 27, 28, 35] {
            cells[index] = "-1";
        }
        cells[36] = "1";
        let expected = format!("[{}]", cells.join(", "));
        assert_eq!(row.board_state, expected);

        let mut ages = vec!["1"; 64];
        for index in [19, 27] {
            ages[index] = "0";
        }
        assert_eq!(row.stability_state, format!("[{}]", ages.join(", ")));
    }

    #[test]
    fn test_list_cell_format() {
        assert_eq!(list_cell([0i8, -1, 1]), "[0, -1, 1]");
        assert_eq!(list_cell(Vec::<u32>::new()), "[]");
    }

    #[test]
    fn test_write_history_header() {
        let mut game = Game::with_id("hdr");
        game.apply_move(2, 3).unwrap();
        let mut buffer = Vec::new();
        let rows = write_history(&game, &mut buffer).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(buffer).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "game_id,game_turn_idx,player,move_r,move_c,is_corner,is_border,is_semi,\
             is_x_square,is_c_square,score_pre_b,score_pre_w,mobility_pre,cells_changed,\
             board_state,stability_state,player_color,\
             score_post_b,score_post_w,mobility_foe_after,forced_pass,game_winner"
        );

        let line = text.lines().nth(1).unwrap();
        assert!(line.starts_with("hdr,0,-1,2,3,false,false,false,false,false,2,2,4,2,\"[0, 0, "));
        assert!(line.ends_with("\",BLACK,4,1,3,false,"));
        assert_eq!(line.matches(", ").count(), 2 * 63);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name("othello_terminal_data_", "20240101_120000_000"),
            "othello_terminal_data_20240101_120000_000.csv"
        );
    }
}
