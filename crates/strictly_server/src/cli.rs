//! Command-line interface for strictly_othello.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Othello - Othello engine with an HTTP front end and self-play runner
#[derive(Parser, Debug)]
#[command(name = "strictly_othello")]
#[command(about = "Othello game server and headless self-play runner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play random games headlessly and export them
    Autoplay {
        /// Number of games to play
        #[arg(short, long, default_value = "1")]
        games: usize,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,

        /// Pause between moves, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Skip CSV export
        #[arg(long)]
        no_export: bool,
    },
}
