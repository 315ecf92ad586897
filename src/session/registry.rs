//! Registry of live sessions.
//!
//! Two indexes over the same set of sessions: by session id and by
//! transport handle. Both live behind one lock, so a session is always in
//! both or in neither.
//!
//! Identifiers are drawn uniformly from `[0, 2^53)` and re-drawn only on a
//! collision with a *currently registered* session. An id freed by a closed
//! session can in principle be drawn again later in the process; with 53
//! bits of randomness that is vanishingly unlikely, not impossible.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;

use super::{ConnectionId, Session, SessionId, MAX_SESSION_ID};

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<SessionId, Arc<Session>>,
    by_connection: HashMap<ConnectionId, Arc<Session>>,
}

impl Indexes {
    fn remove_connection(&mut self, connection: ConnectionId) -> Option<Arc<Session>> {
        let session = self.by_connection.remove(&connection)?;
        self.by_id.remove(&session.id());
        Some(session)
    }
}

/// Thread-safe session registry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    indexes: RwLock<Indexes>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a session for `connection`.
    ///
    /// A session already registered under the same handle is evicted and
    /// closed first.
    pub fn create(&self, connection: ConnectionId) -> Arc<Session> {
        let mut rng = rand::thread_rng();
        let mut indexes = self.indexes.write();

        if let Some(stale) = indexes.remove_connection(connection) {
            tracing::warn!(
                %connection,
                session = %stale.id(),
                "connection reused without close, evicting stale session"
            );
            stale.close();
        }

        let id = loop {
            let candidate = SessionId::new(rng.gen_range(0..MAX_SESSION_ID));
            if !indexes.by_id.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = Arc::new(Session::new(id, connection));
        indexes.by_id.insert(id, session.clone());
        indexes.by_connection.insert(connection, session.clone());
        session
    }

    /// Find the session addressed by a transport handle.
    pub fn find_by_handle(&self, connection: ConnectionId) -> Option<Arc<Session>> {
        self.indexes.read().by_connection.get(&connection).cloned()
    }

    /// Find a session by its identifier.
    pub fn find_by_id(&self, id: SessionId) -> Option<Arc<Session>> {
        self.indexes.read().by_id.get(&id).cloned()
    }

    /// Remove and return the session for a transport handle.
    ///
    /// The returned session is already in the `Closed` state.
    pub fn remove_by_handle(&self, connection: ConnectionId) -> Option<Arc<Session>> {
        let session = self.indexes.write().remove_connection(connection)?;
        session.close();
        Some(session)
    }

    /// Point-in-time copy of every registered session.
    pub fn all(&self) -> Vec<Arc<Session>> {
        self.indexes.read().by_id.values().cloned().collect()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.indexes.read().by_id.len()
    }

    /// Whether no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
