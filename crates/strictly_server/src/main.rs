//! Strictly Othello - Unified CLI
//!
//! Serves the browser front end over HTTP or plays headless self-play games.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::fs::OpenOptions;
use std::sync::Mutex;
use strictly_server::autoplay::{self, AutoplayOptions};
use strictly_server::{AppState, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,strictly_othello=debug,strictly_server=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    init_tracing(&config)?;

    match cli.command {
        Command::Serve { host, port } => {
            config.override_host(host);
            config.override_port(port);
            run_server(config).await
        }
        Command::Autoplay {
            games,
            seed,
            delay_ms,
            no_export,
        } => {
            config.override_autoplay_delay_ms(delay_ms);
            let options = AutoplayOptions {
                games,
                seed,
                export: !no_export,
                ..AutoplayOptions::from_config(&config)
            };
            run_autoplay(config, options).await
        }
    }
}

/// Logs to stderr, and to the configured log file when there is one.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match config.log_filename() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    Ok(())
}

/// Run the HTTP game server
#[instrument(skip(config), fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let address = config.bind_address();
    let app = router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Othello server listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run headless self-play games
#[instrument(skip(config))]
async fn run_autoplay(config: ServerConfig, options: AutoplayOptions) -> Result<()> {
    info!(games = options.games, seed = ?options.seed, "Starting autoplay");
    let reports = autoplay::run(&config, &options).await?;

    let black = reports
        .iter()
        .filter(|r| r.outcome.winner() == Some(strictly_othello::Player::Black))
        .count();
    let white = reports
        .iter()
        .filter(|r| r.outcome.winner() == Some(strictly_othello::Player::White))
        .count();
    let draws = reports.len() - black - white;
    info!(black, white, draws, "Autoplay complete");
    if reports.len() > 1 {
        println!("Black wins: {}  White wins: {}  Draws: {}", black, white, draws);
    }
    Ok(())
}
