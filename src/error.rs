//! Error types for wamp-core.

use thiserror::Error;

use crate::protocol::{MessageKind, Role};

/// Main error type for all protocol operations.
#[derive(Debug, Error)]
pub enum WampError {
    /// Handler bound to an event name outside the role's whitelist.
    #[error("Invalid binding: {event}")]
    InvalidBinding {
        /// Role the binding was attempted on.
        role: Role,
        /// The rejected event name, verbatim.
        event: String,
    },

    /// Frame carries a code with no registered message kind.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(u64),

    /// Frame shape does not match the kind's field schema.
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// The role never originates this message kind.
    #[error("{role} role cannot send {kind}")]
    UnexpectedKind {
        /// Role of the sending engine.
        role: Role,
        /// Kind that was refused.
        kind: MessageKind,
    },

    /// The transport refused the outbound bytes.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Session or connection already closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Application handler reported a failure.
    #[error("Handler error: {0}")]
    Handler(String),
}

/// Result type alias using WampError.
pub type Result<T> = std::result::Result<T, WampError>;
