//! CSV export tests.

use rand::SeedableRng;
use rand::rngs::StdRng;
use strictly_othello::Game;
use strictly_server::export_game;
use tempfile::TempDir;

fn finished_game(seed: u64) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::with_id(format!("export_{seed}"));
    while !game.is_over() {
        game.play_random_move(&mut rng).expect("Random move failed");
    }
    game
}

#[test]
fn test_empty_history_writes_nothing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let out = dir.path().join("nested");
    let game = Game::with_id("empty");

    let result = export_game(&game, &out, "p_").expect("Export failed");
    assert!(result.is_none());
    assert!(!out.exists());
}

#[test]
fn test_export_creates_directory_and_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let out = dir.path().join("game_exports");
    let game = finished_game(1);

    let (path, rows) = export_game(&game, &out, "othello_terminal_data_")
        .expect("Export failed")
        .expect("Nothing exported");

    assert_eq!(rows, game.history().len());
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("othello_terminal_data_export_1.csv")
    );
    assert!(path.starts_with(&out));
}

#[test]
fn test_finished_game_rows_carry_winner() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let game = finished_game(2);
    let winner = game.outcome().expect("Game not finished").sign().to_string();

    let (path, _) = export_game(&game, dir.path(), "w_")
        .expect("Export failed")
        .expect("Nothing exported");

    let mut reader = csv::Reader::from_path(&path).expect("Failed to open CSV");
    let headers = reader.headers().expect("Missing header").clone();
    let winner_col = headers
        .iter()
        .position(|h| h == "game_winner")
        .expect("Missing game_winner column");
    let turn_col = headers
        .iter()
        .position(|h| h == "game_turn_idx")
        .expect("Missing game_turn_idx column");

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Bad CSV row");
    assert_eq!(records.len(), game.history().len());
    for (index, record) in records.iter().enumerate() {
        assert_eq!(&record[winner_col], winner.as_str());
        assert_eq!(record[turn_col].parse::<usize>().ok(), Some(index));
    }
}

#[test]
fn test_rows_carry_pre_move_board_and_stability() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let game = finished_game(3);

    let (path, _) = export_game(&game, dir.path(), "s_")
        .expect("Export failed")
        .expect("Nothing exported");

    let mut reader = csv::Reader::from_path(&path).expect("Failed to open CSV");
    let headers = reader.headers().expect("Missing header").clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .unwrap_or_else(|| panic!("Missing {name} column"))
    };
    let (board_col, stability_col, player_col) =
        (column("board_state"), column("stability_state"), column("player"));

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Bad CSV row");
    for (record, move_record) in records.iter().zip(game.history()) {
        let cells: Vec<i8> = parse_list(&record[board_col]);
        assert_eq!(cells, move_record.board_before().flatten());

        let ages: Vec<u32> = parse_list(&record[stability_col]);
        assert_eq!(ages.as_slice(), &move_record.stability_before().ages()[..]);

        assert_eq!(
            record[player_col].parse::<i8>().ok(),
            Some(move_record.player().sign())
        );
    }
}

fn parse_list<T: std::str::FromStr>(cell: &str) -> Vec<T> {
    cell.trim_start_matches('[')
        .trim_end_matches(']')
        .split(", ")
        .map(|item| item.parse::<T>().ok().expect("Bad list item"))
        .collect()
}

#[test]
fn test_games_created_together_export_to_separate_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut first = Game::new();
    let mut second = Game::new();
    first.apply_move(2, 3).expect("Opening move failed");
    second.apply_move(3, 2).expect("Opening move failed");

    let (first_path, _) = export_game(&first, dir.path(), "x_")
        .expect("Export failed")
        .expect("Nothing exported");
    let (second_path, _) = export_game(&second, dir.path(), "x_")
        .expect("Export failed")
        .expect("Nothing exported");

    assert_ne!(first.game_id(), second.game_id());
    assert_ne!(first_path, second_path);
    assert!(first_path.exists());
    assert!(second_path.exists());
}
