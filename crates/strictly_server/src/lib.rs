//! HTTP boundary, session multiplexing and CSV export for the
//! `strictly_othello` engine.
//!
//! - [`routes`] maps browser requests onto per-session engine calls
//! - [`session`] keeps one independent game per session id
//! - [`export`] writes a game's move history as CSV
//! - [`autoplay`] plays games headlessly with random moves

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod autoplay;
pub mod config;
pub mod export;
pub mod routes;
pub mod session;
pub mod snapshot;

pub use autoplay::{AutoplayError, AutoplayOptions, GameReport};
pub use config::{ConfigError, ServerConfig};
pub use export::{ExportError, ExportRow, export_game, write_history};
pub use routes::{AppState, router};
pub use session::{SessionId, SessionManager};
pub use snapshot::{GameSnapshot, HistoryEntry};
