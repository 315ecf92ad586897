//! Peer roles and the event vocabulary each role may bind.
//!
//! A [`Role::Server`] engine sits on the router side of a connection and
//! receives `hello`, `call`, `publish`, ... A [`Role::Client`] engine sits on
//! the caller side and receives `welcome`, `result`, `event`, ...
//!
//! Both roles additionally accept the lifecycle events `connect` and
//! `disconnect`. Everything else is rejected at bind time.

use std::fmt;

use super::MessageKind;

/// Perspective an engine speaks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Router-facing: accepts inbound sessions from clients.
    Server,
    /// Client-facing: talks to a router.
    Client,
}

impl Role {
    /// The role on the other end of the connection.
    pub const fn peer(self) -> Role {
        match self {
            Role::Server => Role::Client,
            Role::Client => Role::Server,
        }
    }

    /// Whether frames of `kind` are dispatched to handlers in this role.
    pub const fn receives(self, kind: MessageKind) -> bool {
        use MessageKind::*;

        match self {
            Role::Server => matches!(
                kind,
                Hello
                    | Abort
                    | Authenticate
                    | Goodbye
                    | Heartbeat
                    | Register
                    | Unregister
                    | Call
                    | Cancel
                    | Yield
                    | Error
                    | Publish
                    | Subscribe
                    | Unsubscribe
            ),
            Role::Client => matches!(
                kind,
                Challenge
                    | Welcome
                    | Abort
                    | Goodbye
                    | Heartbeat
                    | Error
                    | Registered
                    | Unregistered
                    | Invocation
                    | Interrupt
                    | Result
                    | Published
                    | Subscribed
                    | Unsubscribed
                    | Event
            ),
        }
    }

    /// Whether this role originates frames of `kind`.
    pub const fn can_send(self, kind: MessageKind) -> bool {
        self.peer().receives(kind)
    }

    /// Whether `event` is on this role's binding whitelist.
    pub const fn accepts(self, event: Event) -> bool {
        match event {
            Event::Connect | Event::Disconnect => true,
            Event::Message(kind) => self.receives(kind),
        }
    }

    /// Every event this role accepts.
    pub fn whitelist(self) -> Vec<Event> {
        let mut events = vec![Event::Connect];
        events.extend(
            MessageKind::ALL
                .into_iter()
                .filter(|kind| self.receives(*kind))
                .map(Event::Message),
        );
        events.push(Event::Disconnect);
        events
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => f.write_str("server"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// Something a handler can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Transport connected and a session was created.
    Connect,
    /// Transport closed and the session was removed.
    Disconnect,
    /// A decoded inbound frame.
    Message(MessageKind),
}

impl Event {
    /// External event name (`"connect"`, `"hello"`, `"disconnect"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Event::Connect => "connect",
            Event::Disconnect => "disconnect",
            Event::Message(kind) => kind.event_name(),
        }
    }

    /// Parse an external event name.
    ///
    /// Only the lower-case vocabulary is accepted; `"HELLO"` is not an event name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "connect" => Some(Event::Connect),
            "disconnect" => Some(Event::Disconnect),
            _ => MessageKind::ALL
                .into_iter()
                .find(|kind| kind.event_name() == name)
                .map(Event::Message),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_whitelist_matches_vocabulary() {
        let names: Vec<&str> = Role::Server.whitelist().iter().map(|e| e.name()).collect();
        let expected = [
            "connect",
            "hello",
            "abort",
            "authenticate",
            "goodbye",
            "heartbeat",
            "error",
            "publish",
            "subscribe",
            "unsubscribe",
            "call",
            "cancel",
            "register",
            "unregister",
            "yield",
            "disconnect",
        ];
        assert_eq!(names.len(), expected.len());
        for name in expected {
            assert!(names.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_client_whitelist_matches_vocabulary() {
        let names: Vec<&str> = Role::Client.whitelist().iter().map(|e| e.name()).collect();
        let expected = [
            "connect",
            "challenge",
            "welcome",
            "abort",
            "goodbye",
            "heartbeat",
            "error",
            "registered",
            "unregistered",
            "invocation",
            "interrupt",
            "result",
            "published",
            "subscribed",
            "unsubscribed",
            "event",
            "disconnect",
        ];
        assert_eq!(names.len(), expected.len());
        for name in expected {
            assert!(names.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_can_send_mirrors_peer() {
        assert!(Role::Server.can_send(MessageKind::Welcome));
        assert!(!Role::Server.can_send(MessageKind::Hello));
        assert!(Role::Client.can_send(MessageKind::Hello));
        assert!(!Role::Client.can_send(MessageKind::Result));

        // Both directions
        for kind in [MessageKind::Abort, MessageKind::Goodbye, MessageKind::Heartbeat, MessageKind::Error] {
            assert!(Role::Server.can_send(kind));
            assert!(Role::Client.can_send(kind));
        }
    }

    #[test]
    fn test_event_name_roundtrip() {
        for role in [Role::Server, Role::Client] {
            for event in role.whitelist() {
                assert_eq!(Event::from_name(event.name()), Some(event));
            }
        }
        assert_eq!(Event::from_name("HELLO"), None);
        assert_eq!(Event::from_name("invalid"), None);
    }

    #[test]
    fn test_accepts_lifecycle_events() {
        assert!(Role::Server.accepts(Event::Connect));
        assert!(Role::Client.accepts(Event::Disconnect));
        assert!(!Role::Server.accepts(Event::Message(MessageKind::Welcome)));
    }
}
