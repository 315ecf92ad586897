//! Protocol engine builder and runtime loop.
//!
//! The [`EngineBuilder`] provides a fluent API for configuring the engine and
//! binding handlers. The [`ProtocolEngine`] turns transport notifications into
//! session lifecycle changes and handler triggers:
//! 1. `connect(conn)` - create a session, fire `connect`
//! 2. `message(conn, raw)` - decode, resolve the session, fire the kind's event
//! 3. `close(conn)` - remove the session, fire `disconnect`
//!
//! A bad frame or a failing handler only affects the frame it came with.
//! Decoding failures are logged and dropped; handler errors and panics are
//! caught at dispatch and logged.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wamp_core::transport::ChannelTransport;
//! use wamp_core::{EventContext, ProtocolEngine, Role};
//!
//! let transport = Arc::new(ChannelTransport::new());
//! let engine = ProtocolEngine::builder()
//!     .role(Role::Server)
//!     .bind("hello", |ctx: &EventContext| {
//!         println!("{} joined {:?}", ctx.session().id(), ctx.session().realm());
//!         Ok(())
//!     })
//!     .build(transport)
//!     .unwrap();
//!
//! assert_eq!(engine.role(), Role::Server);
//! ```

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::codec::Serializer;
use crate::error::{Result, WampError};
use crate::handler::{EventContext, EventRouter, Handler, HandlerResult};
use crate::outbound::Outbound;
use crate::protocol::{Event, Fields, FrameCodec, MessageKind, Role};
use crate::session::{ConnectionId, Session, SessionRegistry};
use crate::transport::{Transport, TransportEvent, DEFAULT_CHANNEL_CAPACITY};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Perspective the engine speaks from.
    pub role: Role,
    /// Wire serialization for inbound and outbound frames.
    pub serializer: Serializer,
    /// Server role only: answer HELLO with WELCOME before firing `hello`.
    pub auto_welcome: bool,
    /// Per-connection inbound queue used by [`ProtocolEngine::run`]. A
    /// connection that overflows it is closed.
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            role: Role::Server,
            serializer: Serializer::Json,
            auto_welcome: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Builder for configuring and creating a [`ProtocolEngine`].
pub struct EngineBuilder {
    config: EngineConfig,
    bindings: Vec<(String, Arc<dyn Handler>)>,
}

impl EngineBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            bindings: Vec::new(),
        }
    }

    /// Set the role.
    ///
    /// Default: `Role::Server`
    pub fn role(mut self, role: Role) -> Self {
        self.config.role = role;
        self
    }

    /// Set the serializer.
    ///
    /// Default: `Serializer::Json`
    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.config.serializer = serializer;
        self
    }

    /// Enable or disable the automatic WELCOME reply to HELLO.
    ///
    /// Default: enabled
    pub fn auto_welcome(mut self, enabled: bool) -> Self {
        self.config.auto_welcome = enabled;
        self
    }

    /// Set the per-connection queue capacity used by `run`.
    ///
    /// Default: 1024
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Bind a handler by event name.
    ///
    /// The name is checked against the role's whitelist in `build()`.
    pub fn bind<F>(mut self, event: &str, handler: F) -> Self
    where
        F: Fn(&EventContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.bindings.push((event.to_string(), Arc::new(handler)));
        self
    }

    /// Build the engine over `transport`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBinding` for the first bound name the role rejects.
    pub fn build(self, transport: Arc<dyn Transport>) -> Result<ProtocolEngine> {
        let engine = ProtocolEngine::new(self.config, transport);
        let role = self.config.role;

        for (name, handler) in self.bindings {
            let event = Event::from_name(&name).ok_or_else(|| WampError::InvalidBinding {
                role,
                event: name.clone(),
            })?;
            engine.router.bind_shared(role, event, handler)?;
        }

        Ok(engine)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrates sessions, decoding and handler dispatch for one role.
///
/// Each engine owns its own [`SessionRegistry`] and [`EventRouter`]; nothing
/// is process-global.
pub struct ProtocolEngine {
    config: EngineConfig,
    sessions: SessionRegistry,
    router: EventRouter,
    outbound: Outbound,
}

impl ProtocolEngine {
    /// Create a new engine builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Create an engine with no bindings.
    pub fn new(config: EngineConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            sessions: SessionRegistry::new(),
            router: EventRouter::new(),
            outbound: Outbound::new(config.role, config.serializer, transport),
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.config.role
    }

    /// Live sessions.
    #[inline]
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handler bindings.
    #[inline]
    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Typed senders (`send_welcome`, `send_result`, ...).
    #[inline]
    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// Bind a handler for this engine's role by event name.
    ///
    /// Re-binding replaces the previous handler.
    pub fn bind<F>(&self, event: &str, handler: F) -> Result<()>
    where
        F: Fn(&EventContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.router.bind(self.config.role, event, handler)
    }

    /// Transport connected: create a session and fire `connect`.
    pub fn handle_connect(&self, connection: ConnectionId) -> Arc<Session> {
        let session = self.sessions.create(connection);
        tracing::debug!(%connection, session = %session.id(), "session created");

        self.dispatch(Event::Connect, session.clone(), Fields::new());
        session
    }

    /// Transport delivered a raw message.
    ///
    /// Frames that fail to decode, kinds this role does not receive, and
    /// messages for unknown connections are logged and dropped.
    pub fn handle_message(&self, connection: ConnectionId, raw: &[u8]) {
        let decoded = self
            .config
            .serializer
            .decode(raw)
            .and_then(|frame| FrameCodec::decode(&frame));

        let (kind, fields) = match decoded {
            Ok(decoded) => decoded,
            Err(WampError::UnknownMessageType(code)) => {
                tracing::debug!(%connection, code, "dropping frame with unknown message type");
                return;
            }
            Err(e) => {
                tracing::warn!(%connection, error = %e, "dropping undecodable frame");
                return;
            }
        };

        if !self.config.role.receives(kind) {
            tracing::debug!(
                %connection,
                %kind,
                role = %self.config.role,
                "dropping frame not addressed to this role"
            );
            return;
        }

        let Some(session) = self.sessions.find_by_handle(connection) else {
            tracing::warn!(%connection, %kind, "message for unknown connection");
            return;
        };

        match (self.config.role, kind) {
            (Role::Server, MessageKind::Hello) => {
                if !self.accept_hello(&session, &fields) {
                    return;
                }
            }
            (Role::Client, MessageKind::Welcome) => {
                session.establish(None);
            }
            _ => {}
        }

        self.dispatch(Event::Message(kind), session, fields);
    }

    /// Transport closed: remove the session and fire `disconnect`.
    ///
    /// A close for a connection with no session is a no-op.
    pub fn handle_close(&self, connection: ConnectionId) -> Option<Arc<Session>> {
        let session = self.sessions.remove_by_handle(connection)?;
        tracing::debug!(%connection, session = %session.id(), "session closed");

        self.dispatch(Event::Disconnect, session.clone(), Fields::new());
        Some(session)
    }

    /// Apply one transport notification.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connect(connection) => {
                self.handle_connect(connection);
            }
            TransportEvent::Message(connection, raw) => self.handle_message(connection, &raw),
            TransportEvent::Close(connection) => {
                self.handle_close(connection);
            }
        }
    }

    /// Drive the engine from a stream of transport notifications.
    ///
    /// Each connection lifetime gets its own task, so frames on one connection
    /// are handled in arrival order while distinct connections proceed
    /// independently. A handle that reconnects is not served until the task of
    /// its previous lifetime has finished closing.
    ///
    /// Routing never waits on a connection queue. When a connection's queue is
    /// full the frame is dropped and the connection is closed, so a stalled
    /// handler only holds up its own connection. Handlers run on the runtime's
    /// worker threads; one that blocks needs a multi-threaded runtime for the
    /// other connections to keep moving.
    ///
    /// Returns once `events` is exhausted and every connection task has
    /// drained.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) {
        let mut open: HashMap<ConnectionId, ConnectionTask> = HashMap::new();
        // Tasks of closed connections that may still be draining.
        let mut closing: HashMap<ConnectionId, JoinHandle<()>> = HashMap::new();

        while let Some(event) = events.recv().await {
            let connection = event.connection();

            match event {
                TransportEvent::Connect(_) if !open.contains_key(&connection) => {
                    let previous = closing.remove(&connection);
                    open.insert(connection, self.spawn_connection(previous));
                }
                TransportEvent::Close(_) => {
                    match open.remove(&connection) {
                        Some(task) => {
                            closing.retain(|_, handle| !handle.is_finished());
                            closing.insert(connection, task.close(connection));
                        }
                        None => tracing::debug!(%connection, "close for connection that is not open"),
                    }
                    continue;
                }
                _ => {}
            }

            let Some(task) = open.get(&connection) else {
                tracing::debug!(%connection, "dropping frame for connection that is not open");
                continue;
            };

            match task.tx.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        %connection,
                        capacity = self.config.channel_capacity,
                        "connection queue full, closing connection"
                    );
                    if let Some(task) = open.remove(&connection) {
                        closing.retain(|_, handle| !handle.is_finished());
                        closing.insert(connection, task.close(connection));
                    }
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::error!(%connection, "connection task stopped unexpectedly");
                    open.remove(&connection);
                }
            }
        }

        let handles: Vec<JoinHandle<()>> = open
            .into_values()
            .map(|task| task.handle)
            .chain(closing.into_values())
            .collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "connection task failed");
            }
        }
    }

    /// Start the task serving one connection lifetime.
    fn spawn_connection(self: &Arc<Self>, previous: Option<JoinHandle<()>>) -> ConnectionTask {
        let (tx, mut rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let engine = Arc::clone(self);

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    tracing::error!(error = %e, "connection task failed");
                }
            }
            while let Some(event) = rx.recv().await {
                engine.handle_event(event);
            }
        });

        ConnectionTask { tx, handle }
    }

    /// Record the realm, establish the session and send the WELCOME.
    fn accept_hello(&self, session: &Session, fields: &Fields) -> bool {
        let Some(realm) = fields.get(0).and_then(Value::as_str) else {
            tracing::warn!(
                connection = %session.connection(),
                session = %session.id(),
                "dropping HELLO without a string realm"
            );
            return false;
        };

        if !session.establish(Some(realm.to_string())) {
            return false;
        }

        if self.config.auto_welcome {
            let details = fields.get(1).cloned().unwrap_or_else(|| json!({}));
            if let Err(e) = self.outbound.send_welcome(session, details) {
                tracing::warn!(
                    connection = %session.connection(),
                    session = %session.id(),
                    error = %e,
                    "failed to send WELCOME"
                );
            }
        }
        true
    }

    /// Trigger a handler with panics and errors contained to this call.
    fn dispatch(&self, event: Event, session: Arc<Session>, fields: Fields) {
        let ctx = EventContext::new(event, session, fields, self.outbound.clone());
        let role = self.config.role;

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.router.trigger(role, event, &ctx)));
        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::error!(
                    connection = %ctx.session().connection(),
                    session = %ctx.session().id(),
                    event = event.name(),
                    error = %e,
                    "handler error"
                );
            }
            Err(_) => {
                tracing::error!(
                    connection = %ctx.session().connection(),
                    session = %ctx.session().id(),
                    event = event.name(),
                    "handler panicked"
                );
            }
        }
    }
}

/// Queue and task serving one connection lifetime inside [`ProtocolEngine::run`].
struct ConnectionTask {
    tx: mpsc::Sender<TransportEvent>,
    handle: JoinHandle<()>,
}

impl ConnectionTask {
    /// Queue the close and hand back the task so a reconnect can wait on it.
    ///
    /// The close is never dropped: when the queue is full it is delivered
    /// from a separate task once there is room.
    fn close(self, connection: ConnectionId) -> JoinHandle<()> {
        match self.tx.try_send(TransportEvent::Close(connection)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                let tx = self.tx;
                tokio::spawn(async move {
                    if tx.send(event).await.is_err() {
                        tracing::error!(%connection, "connection task stopped before close");
                    }
                });
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!(%connection, "connection task stopped unexpectedly");
            }
        }
        self.handle
    }
}
