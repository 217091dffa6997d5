//! Game session management for HTTP play.
//!
//! Every session owns an independent [`Game`]. The session map lock is held
//! only for lookup; engine operations run under the game's own lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_othello::Game;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

type SharedGame = Arc<Mutex<Game>>;

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, SharedGame>>>,
    event_log_capacity: usize,
}

/// Recovers the guard from a poisoned lock.
///
/// Engine operations leave the game consistent before any post-check can
/// fail, so the state behind a poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("Recovering poisoned session lock");
        poisoned.into_inner()
    })
}

impl SessionManager {
    /// Creates a session manager keeping the default number of events per game.
    #[instrument]
    pub fn new() -> Self {
        Self::with_event_capacity(strictly_othello::DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a session manager whose games keep `capacity` events.
    #[instrument]
    pub fn with_event_capacity(capacity: usize) -> Self {
        info!(capacity, "Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            event_log_capacity: capacity,
        }
    }

    fn get_or_create(&self, session_id: &str) -> SharedGame {
        let mut sessions = lock(&self.sessions);
        if let Some(game) = sessions.get(session_id) {
            return Arc::clone(game);
        }
        let game = Arc::new(Mutex::new(
            Game::new().with_event_capacity(self.event_log_capacity),
        ));
        sessions.insert(session_id.to_string(), Arc::clone(&game));
        info!(session_id, "Created new session");
        game
    }

    /// Runs `f` against the session's game, creating the session if needed.
    ///
    /// Calls on the same session are serialised; different sessions never
    /// wait on one another beyond the map lookup.
    #[instrument(skip(self, f))]
    pub fn with_game<T>(&self, session_id: &str, f: impl FnOnce(&mut Game) -> T) -> T {
        let game = self.get_or_create(session_id);
        let mut guard = lock(&game);
        f(&mut guard)
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let sessions = lock(&self.sessions);
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Drops a session. Returns whether it existed.
    #[instrument(skip(self))]
    pub fn remove_session(&self, session_id: &str) -> bool {
        let removed = lock(&self.sessions).remove(session_id).is_some();
        if removed {
            info!(session_id, "Removed session");
        } else {
            debug!(session_id, "Session not found");
        }
        removed
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
