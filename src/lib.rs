//! # wamp-core
//!
//! Protocol core for WAMP v2 (Web Application Messaging Protocol).
//!
//! This crate sits between a transport (WebSocket, RawSocket, in-memory
//! channels) and application handlers. It knows the message kinds and their
//! positional wire format, tracks one session per connection and dispatches
//! decoded frames to handlers bound per role.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): message kind table, [`Frame`], [`FrameCodec`]
//! - **Codec** ([`codec`]): `wamp.2.json` and `wamp.2.msgpack` bytes
//! - **Sessions** ([`session`]): [`Session`] and [`SessionRegistry`]
//! - **Handlers** ([`handler`]): [`EventRouter`] and [`EventContext`]
//! - **Engine**: [`ProtocolEngine`] wiring a [`Transport`] to all of the above
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::Value;
//! use wamp_core::session::ConnectionId;
//! use wamp_core::transport::ChannelTransport;
//! use wamp_core::{EventContext, ProtocolEngine};
//!
//! let transport = Arc::new(ChannelTransport::new());
//! let engine = ProtocolEngine::builder()
//!     .bind("call", |ctx: &EventContext| {
//!         let request_id = ctx.field("request_id").and_then(Value::as_u64).unwrap_or(0);
//!         let args = ctx.field("arguments").cloned();
//!         ctx.outbound()
//!             .send_result(ctx.session(), request_id, serde_json::json!({}), args, None)
//!     })
//!     .build(transport.clone())
//!     .unwrap();
//!
//! let conn = ConnectionId::new(1);
//! let mut outbox = transport.open(conn);
//! engine.handle_connect(conn);
//! engine.handle_message(conn, br#"[1,"realm1",{}]"#);
//! engine.handle_message(conn, br#"[48,7,{},"echo",["x"]]"#);
//!
//! assert!(outbox.try_recv().unwrap().starts_with(b"[2,"));
//! assert_eq!(&outbox.try_recv().unwrap()[..], br#"[50,7,{},["x"]]"#);
//! ```

pub mod codec;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod session;
pub mod transport;

mod engine;
mod outbound;

pub use codec::Serializer;
pub use engine::{EngineBuilder, EngineConfig, ProtocolEngine};
pub use error::{Result, WampError};
pub use handler::{EventContext, EventRouter, Handler, HandlerResult};
pub use outbound::Outbound;
pub use protocol::{Event, Fields, Frame, FrameCodec, MessageKind, Role};
pub use session::{ConnectionId, Session, SessionId, SessionRegistry, SessionState};
pub use transport::{ChannelTransport, Transport, TransportEvent};
