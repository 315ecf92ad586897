//! Transport module - the boundary to the connection layer.
//!
//! The engine never touches sockets. A transport delivers lifecycle and
//! message notifications as [`TransportEvent`]s keyed by [`ConnectionId`],
//! and accepts outbound bytes through [`Transport::send`].
//!
//! [`ChannelTransport`] is an in-memory implementation built on tokio
//! channels; a WebSocket or RawSocket adapter bridges its receivers to the
//! real connection writers.

mod channel;

pub use channel::{ChannelTransport, DEFAULT_CHANNEL_CAPACITY};

use bytes::Bytes;

use crate::error::Result;
use crate::session::ConnectionId;

/// Outbound half of a transport.
pub trait Transport: Send + Sync + 'static {
    /// Queue `payload` for delivery on `connection`.
    ///
    /// Back-pressure and write errors are the transport's concern; an
    /// implementation reports a refused payload as an error.
    fn send(&self, connection: ConnectionId, payload: Bytes) -> Result<()>;
}

/// Inbound notification from a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// A connection was opened.
    Connect(ConnectionId),
    /// A complete message arrived on a connection.
    Message(ConnectionId, Bytes),
    /// A connection was closed.
    Close(ConnectionId),
}

impl TransportEvent {
    /// The connection this event belongs to.
    pub fn connection(&self) -> ConnectionId {
        match self {
            TransportEvent::Connect(connection)
            | TransportEvent::Message(connection, _)
            | TransportEvent::Close(connection) => *connection,
        }
    }
}
