//! Outbound frame sending.
//!
//! [`Outbound`] is the only path from application code to the wire:
//!
//! ```text
//! send_x(session, ..) ─► FrameCodec::encode ─► Serializer::encode ─► Transport::send(conn)
//! ```
//!
//! Every typed sender keeps the kind's field order and emits optional
//! trailing fields only when they are `Some`. A role may only send the kinds
//! its peer receives; anything else is refused with `UnexpectedKind`.
//!
//! # Example
//!
//! ```ignore
//! engine.bind("call", |ctx: &EventContext| {
//!     let request_id = ctx.field("request_id").and_then(Value::as_u64).unwrap_or(0);
//!     ctx.outbound()
//!         .send_result(ctx.session(), request_id, json!({}), Some(json!([42])), None)
//! })?;
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::codec::Serializer;
use crate::error::{Result, WampError};
use crate::protocol::{Fields, FrameCodec, MessageKind, Role};
use crate::session::Session;
use crate::transport::Transport;

/// Cheaply cloneable handle for sending frames to sessions.
#[derive(Clone)]
pub struct Outbound {
    role: Role,
    serializer: Serializer,
    transport: Arc<dyn Transport>,
}

impl Outbound {
    /// Create a sender for `role` over `transport`.
    pub fn new(role: Role, serializer: Serializer, transport: Arc<dyn Transport>) -> Self {
        Self {
            role,
            serializer,
            transport,
        }
    }

    /// Role frames are sent as.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Serializer used for outbound bytes.
    #[inline]
    pub fn serializer(&self) -> Serializer {
        self.serializer
    }

    /// Encode and send an arbitrary kind.
    ///
    /// # Errors
    ///
    /// - `UnexpectedKind` if this role never originates `kind`
    /// - `ConnectionClosed` if the session is closed
    /// - `MalformedFrame` if `fields` do not fit the kind's schema
    /// - any transport error
    pub fn send(&self, session: &Session, kind: MessageKind, fields: Fields) -> Result<()> {
        if !self.role.can_send(kind) {
            return Err(WampError::UnexpectedKind {
                role: self.role,
                kind,
            });
        }
        if session.is_closed() {
            return Err(WampError::ConnectionClosed);
        }

        let frame = FrameCodec::encode(kind, &fields)?;
        let bytes = self.serializer.encode(&frame)?;

        tracing::trace!(
            connection = %session.connection(),
            session = %session.id(),
            %kind,
            len = bytes.len(),
            "sending frame"
        );
        self.transport.send(session.connection(), bytes)
    }

    // Session lifecycle

    /// `[HELLO, realm, details]`. Records the realm on the session.
    pub fn send_hello(&self, session: &Session, realm: &str, details: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Hello,
            Fields::new().with(Value::from(realm)).with(details),
        )?;
        session.set_realm(realm.to_string());
        Ok(())
    }

    /// `[WELCOME, session, details]` carrying the session's own id.
    pub fn send_welcome(&self, session: &Session, details: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Welcome,
            Fields::new().with(Value::from(session.id().get())).with(details),
        )
    }

    /// `[ABORT, details, reason]`
    pub fn send_abort(&self, session: &Session, details: Value, reason: &str) -> Result<()> {
        self.send(
            session,
            MessageKind::Abort,
            Fields::new().with(details).with(Value::from(reason)),
        )
    }

    /// `[CHALLENGE, challenge, extra]`
    pub fn send_challenge(&self, session: &Session, challenge: &str, extra: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Challenge,
            Fields::new().with(Value::from(challenge)).with(extra),
        )
    }

    /// `[AUTHENTICATE, signature, extra]`
    pub fn send_authenticate(&self, session: &Session, signature: &str, extra: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Authenticate,
            Fields::new().with(Value::from(signature)).with(extra),
        )
    }

    /// `[GOODBYE, details, reason]` from a client, `[GOODBYE, reason, details]`
    /// from a server.
    pub fn send_goodbye(&self, session: &Session, details: Value, reason: &str) -> Result<()> {
        let reason = Value::from(reason);
        let fields = match self.role {
            Role::Server => Fields::new().with(reason).with(details),
            Role::Client => Fields::new().with(details).with(reason),
        };
        self.send(session, MessageKind::Goodbye, fields)
    }

    /// `[HEARTBEAT, incoming_seq, outgoing_seq, discard?]`
    pub fn send_heartbeat(
        &self,
        session: &Session,
        incoming_seq: u64,
        outgoing_seq: u64,
        discard: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Heartbeat,
            Fields::new()
                .with(Value::from(incoming_seq))
                .with(Value::from(outgoing_seq))
                .with_opt(discard),
        )
    }

    /// `[ERROR, request_type, request_id, details, error, arguments?, arguments_kw?]`
    #[allow(clippy::too_many_arguments)]
    pub fn send_error(
        &self,
        session: &Session,
        request_type: MessageKind,
        request_id: u64,
        details: Value,
        error: &str,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Error,
            Fields::new()
                .with(Value::from(request_type.code()))
                .with(Value::from(request_id))
                .with(details)
                .with(Value::from(error))
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    // Publish & subscribe

    /// `[PUBLISH, request_id, options, topic_uri, arguments?, arguments_kw?]`
    pub fn send_publish(
        &self,
        session: &Session,
        request_id: u64,
        options: Value,
        topic_uri: &str,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Publish,
            Fields::new()
                .with(Value::from(request_id))
                .with(options)
                .with(Value::from(topic_uri))
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    /// `[PUBLISHED, request_id, publication_id]`
    pub fn send_published(&self, session: &Session, request_id: u64, publication_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Published,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(publication_id)),
        )
    }

    /// `[SUBSCRIBE, request_id, options, topic_uri]`
    pub fn send_subscribe(
        &self,
        session: &Session,
        request_id: u64,
        options: Value,
        topic_uri: &str,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Subscribe,
            Fields::new()
                .with(Value::from(request_id))
                .with(options)
                .with(Value::from(topic_uri)),
        )
    }

    /// `[SUBSCRIBED, request_id, subscription_id]`
    pub fn send_subscribed(&self, session: &Session, request_id: u64, subscription_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Subscribed,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(subscription_id)),
        )
    }

    /// `[UNSUBSCRIBE, request_id, subscription_id]`
    pub fn send_unsubscribe(&self, session: &Session, request_id: u64, subscription_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Unsubscribe,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(subscription_id)),
        )
    }

    /// `[UNSUBSCRIBED, request_id]`
    pub fn send_unsubscribed(&self, session: &Session, request_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Unsubscribed,
            Fields::new().with(Value::from(request_id)),
        )
    }

    /// `[EVENT, subscription_id, publication_id, details, arguments?, arguments_kw?]`
    pub fn send_event(
        &self,
        session: &Session,
        subscription_id: u64,
        publication_id: u64,
        details: Value,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Event,
            Fields::new()
                .with(Value::from(subscription_id))
                .with(Value::from(publication_id))
                .with(details)
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    // Remote procedure calls

    /// `[CALL, request_id, options, procedure, arguments?, arguments_kw?]`
    pub fn send_call(
        &self,
        session: &Session,
        request_id: u64,
        options: Value,
        procedure: &str,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Call,
            Fields::new()
                .with(Value::from(request_id))
                .with(options)
                .with(Value::from(procedure))
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    /// `[CANCEL, request_id, options]`
    pub fn send_cancel(&self, session: &Session, request_id: u64, options: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Cancel,
            Fields::new().with(Value::from(request_id)).with(options),
        )
    }

    /// `[RESULT, request_id, details, arguments?, arguments_kw?]`
    pub fn send_result(
        &self,
        session: &Session,
        request_id: u64,
        details: Value,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Result,
            Fields::new()
                .with(Value::from(request_id))
                .with(details)
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    /// `[REGISTER, request_id, options, procedure]`
    pub fn send_register(
        &self,
        session: &Session,
        request_id: u64,
        options: Value,
        procedure: &str,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Register,
            Fields::new()
                .with(Value::from(request_id))
                .with(options)
                .with(Value::from(procedure)),
        )
    }

    /// `[REGISTERED, request_id, registration_id]`
    pub fn send_registered(&self, session: &Session, request_id: u64, registration_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Registered,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(registration_id)),
        )
    }

    /// `[UNREGISTER, request_id, registration_id]`
    pub fn send_unregister(&self, session: &Session, request_id: u64, registration_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Unregister,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(registration_id)),
        )
    }

    /// `[UNREGISTERED, request_id]`
    pub fn send_unregistered(&self, session: &Session, request_id: u64) -> Result<()> {
        self.send(
            session,
            MessageKind::Unregistered,
            Fields::new().with(Value::from(request_id)),
        )
    }

    /// `[INVOCATION, request_id, registration_id, details, arguments?, arguments_kw?]`
    pub fn send_invocation(
        &self,
        session: &Session,
        request_id: u64,
        registration_id: u64,
        details: Value,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Invocation,
            Fields::new()
                .with(Value::from(request_id))
                .with(Value::from(registration_id))
                .with(details)
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }

    /// `[INTERRUPT, request_id, options]`
    pub fn send_interrupt(&self, session: &Session, request_id: u64, options: Value) -> Result<()> {
        self.send(
            session,
            MessageKind::Interrupt,
            Fields::new().with(Value::from(request_id)).with(options),
        )
    }

    /// `[YIELD, request_id, options, arguments?, arguments_kw?]`
    pub fn send_yield(
        &self,
        session: &Session,
        request_id: u64,
        options: Value,
        arguments: Option<Value>,
        arguments_kw: Option<Value>,
    ) -> Result<()> {
        self.send(
            session,
            MessageKind::Yield,
            Fields::new()
                .with(Value::from(request_id))
                .with(options)
                .with_opt(arguments)
                .with_opt(arguments_kw),
        )
    }
}
