//! Channel-backed transport.
//!
//! Each open connection owns a bounded `mpsc` queue. [`Transport::send`]
//! never waits: a full queue or a dropped receiver is reported as an error
//! so one slow connection cannot stall the engine.
//!
//! ```text
//! Engine ─► ChannelTransport::send(conn) ─► mpsc::Sender<Bytes> ─► socket writer
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::Transport;
use crate::error::{Result, WampError};
use crate::session::ConnectionId;

/// Default per-connection outbound queue capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// In-memory transport keyed by connection id.
#[derive(Debug)]
pub struct ChannelTransport {
    outbound: RwLock<HashMap<ConnectionId, mpsc::Sender<Bytes>>>,
    capacity: usize,
}

impl ChannelTransport {
    /// Create a transport with the default queue capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a transport with a custom per-connection queue capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outbound: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a connection and return the receiver its writer drains.
    ///
    /// Re-opening an id replaces the previous queue.
    pub fn open(&self, connection: ConnectionId) -> mpsc::Receiver<Bytes> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.outbound.write().insert(connection, tx);
        rx
    }

    /// Forget a connection. Its receiver sees end-of-stream once drained.
    pub fn close(&self, connection: ConnectionId) -> bool {
        self.outbound.write().remove(&connection).is_some()
    }

    /// Whether a connection is currently open.
    pub fn is_open(&self, connection: ConnectionId) -> bool {
        self.outbound.read().contains_key(&connection)
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.outbound.read().len()
    }
}

impl Default for ChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, connection: ConnectionId, payload: Bytes) -> Result<()> {
        let tx = self
            .outbound
            .read()
            .get(&connection)
            .cloned()
            .ok_or(WampError::ConnectionClosed)?;

        tx.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                WampError::Transport(format!("outbound queue full for {connection}"))
            }
            mpsc::error::TrySendError::Closed(_) => WampError::ConnectionClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_receiver() {
        let transport = ChannelTransport::new();
        let mut rx = transport.open(ConnectionId::new(1));

        transport
            .send(ConnectionId::new(1), Bytes::from_static(b"[2,1,{}]"))
            .unwrap();

        assert_eq!(rx.recv().await.unwrap(), Bytes::from_static(b"[2,1,{}]"));
    }

    #[test]
    fn test_send_to_unknown_connection() {
        let transport = ChannelTransport::new();
        let result = transport.send(ConnectionId::new(1), Bytes::new());
        assert!(matches!(result, Err(WampError::ConnectionClosed)));
    }

    #[test]
    fn test_send_to_full_queue() {
        let transport = ChannelTransport::with_capacity(1);
        let _rx = transport.open(ConnectionId::new(1));

        assert!(transport.send(ConnectionId::new(1), Bytes::new()).is_ok());
        let result = transport.send(ConnectionId::new(1), Bytes::new());
        assert!(matches!(result, Err(WampError::Transport(_))));
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let transport = ChannelTransport::new();
        drop(transport.open(ConnectionId::new(1)));

        let result = transport.send(ConnectionId::new(1), Bytes::new());
        assert!(matches!(result, Err(WampError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_close_ends_stream() {
        let transport = ChannelTransport::new();
        let mut rx = transport.open(ConnectionId::new(1));

        assert!(transport.is_open(ConnectionId::new(1)));
        assert!(transport.close(ConnectionId::new(1)));
        assert!(!transport.close(ConnectionId::new(1)));
        assert_eq!(transport.connection_count(), 0);
        assert!(rx.recv().await.is_none());
    }
}
