//! Session identity and lifecycle state.

use std::fmt;

use parking_lot::Mutex;

/// Exclusive upper bound for session identifiers (2^53).
///
/// WAMP IDs must round-trip through IEEE-754 doubles, so they are drawn from
/// `[0, 2^53)`.
pub const MAX_SESSION_ID: u64 = 1 << 53;

/// Opaque transport-level connection handle.
///
/// Chosen by the transport; must stay stable for the connection's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a transport-assigned handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Protocol-level session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier, as carried in WELCOME.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport connected, no handshake yet.
    Connected,
    /// Handshake frame processed.
    Established,
    /// Transport closed. Terminal.
    Closed,
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    realm: Option<String>,
}

/// One live connection at the protocol layer.
///
/// Sessions never perform I/O themselves; outbound frames are addressed to
/// [`Session::connection`] through an [`Outbound`](crate::Outbound).
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    connection: ConnectionId,
    inner: Mutex<Inner>,
}

impl Session {
    pub(crate) fn new(id: SessionId, connection: ConnectionId) -> Self {
        Self {
            id,
            connection,
            inner: Mutex::new(Inner {
                state: SessionState::Connected,
                realm: None,
            }),
        }
    }

    /// Session identifier.
    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Transport handle this session is addressed by.
    #[inline]
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Realm recorded at handshake, if any.
    pub fn realm(&self) -> Option<String> {
        self.inner.lock().realm.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Whether the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed
    }

    /// Record the realm without changing state.
    ///
    /// Returns `false` once closed.
    pub(crate) fn set_realm(&self, realm: String) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Closed {
            return false;
        }
        inner.realm = Some(realm);
        true
    }

    /// Move to `Established`, optionally recording the realm.
    ///
    /// Returns `false` once closed.
    pub(crate) fn establish(&self, realm: Option<String>) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Closed {
            return false;
        }
        if realm.is_some() {
            inner.realm = realm;
        }
        inner.state = SessionState::Established;
        true
    }

    /// Move to the terminal `Closed` state.
    pub(crate) fn close(&self) {
        self.inner.lock().state = SessionState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_connected() {
        let session = Session::new(SessionId::new(7), ConnectionId::new(1));
        assert_eq!(session.id().get(), 7);
        assert_eq!(session.connection(), ConnectionId::new(1));
        assert_eq!(session.state(), SessionState::Connected);
        assert!(session.realm().is_none());
    }

    #[test]
    fn test_establish_records_realm() {
        let session = Session::new(SessionId::new(7), ConnectionId::new(1));
        assert!(session.establish(Some("realm1".into())));
        assert_eq!(session.state(), SessionState::Established);
        assert_eq!(session.realm().as_deref(), Some("realm1"));

        // Establishing without a realm keeps the recorded one
        assert!(session.establish(None));
        assert_eq!(session.realm().as_deref(), Some("realm1"));
    }

    #[test]
    fn test_closed_is_terminal() {
        let session = Session::new(SessionId::new(7), ConnectionId::new(1));
        session.close();

        assert!(session.is_closed());
        assert!(!session.establish(Some("realm1".into())));
        assert!(!session.set_realm("realm1".into()));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.realm().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionId::new(3).to_string(), "conn-3");
        assert_eq!(SessionId::new(42).to_string(), "42");
    }
}
