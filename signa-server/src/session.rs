// Session registry
// Tracks open streaming connections for status reporting

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub type SessionId = String;

/// Bookkeeping for one streaming connection
#[derive(Debug, Clone)]
pub struct SessionState {
    pub connected_at: u64,
    pub frames_received: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session already registered: {0}")]
    Duplicate(SessionId),
    #[error("Maximum sessions ({0}) reached")]
    CapacityReached(usize),
}

/// Registry of open sessions. The map is the only mutable state shared
/// between sessions; every mutation takes the write lock.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, SessionState>>,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    pub fn new_session_id() -> SessionId {
        Uuid::new_v4().to_string()
    }

    /// Register a new session
    pub fn register(&self, id: SessionId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();

        if sessions.contains_key(&id) {
            return Err(SessionError::Duplicate(id));
        }

        if sessions.len() >= self.max_sessions {
            return Err(SessionError::CapacityReached(self.max_sessions));
        }

        sessions.insert(
            id.clone(),
            SessionState {
                connected_at: now_secs(),
                frames_received: 0,
            },
        );
        let total = sessions.len();
        drop(sessions);

        info!("Client connected: {}. Total connections: {}", id, total);
        Ok(())
    }

    /// Register a session whose lifetime is tied to the returned guard
    pub fn register_guarded(self: &Arc<Self>, id: SessionId) -> Result<SessionGuard, SessionError> {
        self.register(id.clone())?;
        Ok(SessionGuard {
            manager: Arc::clone(self),
            id,
        })
    }

    /// Remove a session. Unknown ids are a no-op.
    pub fn deregister(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write();
        let removed = sessions.remove(id);
        let total = sessions.len();
        drop(sessions);

        match removed {
            Some(state) => {
                info!(
                    "Client disconnected: {} ({} frames in {}s). Total connections: {}",
                    id,
                    state.frames_received,
                    now_secs().saturating_sub(state.connected_at),
                    total
                );
                true
            }
            None => false,
        }
    }

    /// Number of open sessions. Advisory only.
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<SessionState> {
        self.sessions.read().get(id).cloned()
    }

    /// Note that a frame arrived on the session
    pub fn record_frame(&self, id: &str) {
        if let Some(state) = self.sessions.write().get_mut(id) {
            state.frames_received += 1;
            debug!("Session {} frame #{}", id, state.frames_received);
        }
    }
}

/// Deregisters its session when dropped, on every exit path of the owning task
pub struct SessionGuard {
    manager: Arc<SessionManager>,
    id: SessionId,
}

impl SessionGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.manager.deregister(&self.id);
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
