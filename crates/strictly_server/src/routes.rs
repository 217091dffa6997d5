//! HTTP routes mapping requests onto per-session engine calls.
//!
//! Every game route answers with the session's [`GameSnapshot`]. A move the
//! engine rejects is not an HTTP error: the unchanged snapshot is served
//! again. Only internal failures produce a 500 with `{"error": "..."}`.

use crate::config::ServerConfig;
use crate::export::{ExportError, export_game};
use crate::session::{SessionId, SessionManager};
use crate::snapshot::GameSnapshot;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_othello::{Game, MoveError};
use tower::util::MapRequestLayer;
use tracing::{debug, error, info, instrument, warn};

/// Coordinate used when a request omits `row` or `col`.
pub const MISSING_COORD: i64 = -99;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Per-session games.
    pub sessions: SessionManager,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates state with one session manager for `config`.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: SessionManager::with_event_capacity(*config.event_log_capacity()),
            config: Arc::new(config),
        }
    }
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MoveRequest {
    /// Target row.
    #[serde(default = "missing_coord")]
    pub row: i64,
    /// Target column.
    #[serde(default = "missing_coord")]
    pub col: i64,
}

fn missing_coord() -> i64 {
    MISSING_COORD
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportResponse {
    /// Written file, `None` when the game had no moves.
    pub path: Option<String>,
    /// Rows written.
    pub rows: usize,
}

/// Internal failure reported as a 500.
#[derive(Debug, Clone)]
pub struct ApiError {
    message: String,
}

impl ApiError {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::new(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.message, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", get(get_state).delete(remove_session))
        .route("/sessions/{id}/move", post(make_move))
        .route("/sessions/{id}/bot-move", post(bot_move))
        .route("/sessions/{id}/undo", post(undo))
        .route("/sessions/{id}/reset", post(reset))
        .route("/sessions/{id}/export", post(export))
        .layer(MapRequestLayer::new(log_request))
        .with_state(state)
}

fn log_request(req: Request<Body>) -> Request<Body> {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Converts an engine result into a snapshot, keeping rejections as no-ops.
fn settle<T>(game: &Game, result: Result<T, MoveError>) -> ApiResult<GameSnapshot> {
    match result {
        Ok(_) => Ok(Json(GameSnapshot::from(game))),
        Err(err) if err.is_internal() => Err(err.into()),
        Err(err) => {
            debug!(error = %err, "Operation did not apply");
            Ok(Json(GameSnapshot::from(game)))
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionId>> {
    Json(state.sessions.list_sessions())
}

#[instrument(skip(state))]
async fn get_state(State(state): State<AppState>, Path(id): Path<SessionId>) -> Json<GameSnapshot> {
    Json(state.sessions.with_game(&id, |game| GameSnapshot::from(&*game)))
}

#[instrument(skip(state))]
async fn remove_session(State(state): State<AppState>, Path(id): Path<SessionId>) -> StatusCode {
    if state.sessions.remove_session(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<MoveRequest>,
) -> ApiResult<GameSnapshot> {
    state.sessions.with_game(&id, |game| {
        let result = game.apply_move(request.row, request.col);
        if let Err(err) = &result {
            warn!(session_id = %id, error = %err, "Invalid move attempted");
        }
        settle(game, result)
    })
}

#[instrument(skip(state))]
async fn bot_move(State(state): State<AppState>, Path(id): Path<SessionId>) -> ApiResult<GameSnapshot> {
    state.sessions.with_game(&id, |game| {
        let result = game.play_random_move(&mut rand::rng());
        settle(game, result)
    })
}

#[instrument(skip(state))]
async fn undo(State(state): State<AppState>, Path(id): Path<SessionId>) -> ApiResult<GameSnapshot> {
    state.sessions.with_game(&id, |game| {
        let result = game.undo();
        settle(game, result)
    })
}

#[instrument(skip(state))]
async fn reset(State(state): State<AppState>, Path(id): Path<SessionId>) -> Json<GameSnapshot> {
    state.sessions.with_game(&id, |game| {
        game.reset();
        info!(session_id = %id, game_id = %game.game_id(), "Game reset");
        Json(GameSnapshot::from(&*game))
    })
}

#[instrument(skip(state))]
async fn export(State(state): State<AppState>, Path(id): Path<SessionId>) -> ApiResult<ExportResponse> {
    let config = Arc::clone(&state.config);
    let game = state.sessions.with_game(&id, |game| game.clone());
    let exported = tokio::task::spawn_blocking(move || {
        export_game(&game, config.export_dir(), config.export_prefix())
    })
    .await
    .map_err(|e| ApiError::new(format!("Export task failed: {}", e)))??;

    let response = match exported {
        Some((path, rows)) => ExportResponse {
            path: Some(path.display().to_string()),
            rows,
        },
        None => ExportResponse {
            path: None,
            rows: 0,
        },
    };
    Ok(Json(response))
}
