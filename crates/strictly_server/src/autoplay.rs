//! Headless self-play runner.
//!
//! Plays random moves for both sides until the game ends, prints the final
//! position and exports the history, for as many games as requested.

use crate::config::ServerConfig;
use crate::export::{ExportError, export_game};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;
use strictly_othello::{Game, MoveError, Outcome, Score};
use tracing::{debug, info, instrument};

/// Options for a self-play run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayOptions {
    /// Number of games to play.
    pub games: usize,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
    /// Pause after every move.
    pub delay: Duration,
    /// Write a CSV per game.
    pub export: bool,
}

impl AutoplayOptions {
    /// One exported game with the configured delay.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            games: 1,
            seed: None,
            delay: Duration::from_millis(*config.autoplay_delay_ms()),
            export: true,
        }
    }
}

/// Summary of one finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// Game identifier.
    pub game_id: String,
    /// Moves played.
    pub moves: usize,
    /// Final score.
    pub score: Score,
    /// Final outcome.
    pub outcome: Outcome,
    /// Exported file, if any.
    pub export_path: Option<PathBuf>,
}

/// Self-play failure.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AutoplayError {
    /// The engine reported an internal failure.
    #[display("Engine error: {}", _0)]
    Move(MoveError),
    /// Writing the CSV failed.
    #[display("{}", _0)]
    Export(ExportError),
}

/// Plays one game to completion.
#[instrument(skip(game, rng, delay), fields(game_id = %game.game_id()))]
pub async fn play_out(
    game: &mut Game,
    rng: &mut StdRng,
    delay: Duration,
) -> Result<Outcome, MoveError> {
    while !game.is_over() {
        let transition = game.play_random_move(rng)?;
        debug!(?transition, moves = game.history().len(), "Auto move");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    game.outcome().ok_or_else(|| {
        MoveError::InvariantViolation("Finished game has no outcome".to_string())
    })
}

/// Runs `options.games` games and returns one report per game.
#[instrument(skip(config))]
pub async fn run(
    config: &ServerConfig,
    options: &AutoplayOptions,
) -> Result<Vec<GameReport>, AutoplayError> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut reports = Vec::with_capacity(options.games);
    for _ in 0..options.games {
        let mut game = Game::new().with_event_capacity(*config.event_log_capacity());

        let outcome = play_out(&mut game, &mut rng, options.delay).await?;
        println!("{}", render_summary(&game, outcome));

        let export_path = if options.export {
            export_game(&game, config.export_dir(), config.export_prefix())?.map(|(path, _)| path)
        } else {
            None
        };
        if let Some(path) = &export_path {
            println!("Exported to {}", path.display());
        }

        info!(
            game_id = %game.game_id(),
            moves = game.history().len(),
            outcome = %outcome,
            "Autoplay game finished"
        );
        reports.push(GameReport {
            game_id: game.game_id().to_string(),
            moves: game.history().len(),
            score: game.score(),
            outcome,
            export_path,
        });
    }
    Ok(reports)
}

/// Final board, score and result as printed after each game.
pub fn render_summary(game: &Game, outcome: Outcome) -> String {
    let score = game.score();
    format!(
        "Game {}\n{}Black: {}  White: {}\nResult: {}",
        game.game_id(),
        game.board(),
        score.black,
        score.white,
        outcome
    )
}
