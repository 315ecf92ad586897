//! Codec module - byte-level serialization for frames.
//!
//! This module provides the two WAMP v2 serializers:
//!
//! - [`JsonCodec`] - `wamp.2.json`, using `serde_json`
//! - [`MsgPackCodec`] - `wamp.2.msgpack`, using `rmp-serde`
//!
//! # Design
//!
//! Codecs are marker structs with static methods. [`Serializer`] picks one
//! at runtime (from the negotiated subprotocol) and converts between raw
//! transport bytes and [`Frame`](crate::protocol::Frame)s.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use wamp_core::codec::Serializer;
//! use wamp_core::protocol::Frame;
//!
//! let serializer = Serializer::from_subprotocol("wamp.2.json").unwrap();
//! let frame = serializer.decode(br#"[1,"realm1",{}]"#).unwrap();
//! assert_eq!(frame.code(), 1);
//!
//! let bytes = serializer.encode(&Frame::new(2, vec![json!(9), json!({})])).unwrap();
//! assert_eq!(&bytes[..], br#"[2,9,{}]"#);
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::Frame;

/// Subprotocol name for JSON serialization.
pub const JSON_SUBPROTOCOL: &str = "wamp.2.json";

/// Subprotocol name for MsgPack serialization.
pub const MSGPACK_SUBPROTOCOL: &str = "wamp.2.msgpack";

/// Frame serialization negotiated with the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Serializer {
    /// Text frames, JSON arrays.
    #[default]
    Json,
    /// Binary frames, MsgPack arrays.
    MsgPack,
}

impl Serializer {
    /// Pick a serializer from a WebSocket subprotocol name.
    pub fn from_subprotocol(name: &str) -> Option<Self> {
        match name {
            JSON_SUBPROTOCOL => Some(Serializer::Json),
            MSGPACK_SUBPROTOCOL => Some(Serializer::MsgPack),
            _ => None,
        }
    }

    /// The WebSocket subprotocol name.
    pub fn subprotocol(self) -> &'static str {
        match self {
            Serializer::Json => JSON_SUBPROTOCOL,
            Serializer::MsgPack => MSGPACK_SUBPROTOCOL,
        }
    }

    /// Whether the transport should carry binary rather than text messages.
    pub fn is_binary(self) -> bool {
        matches!(self, Serializer::MsgPack)
    }

    /// Serialize a frame into transport bytes.
    pub fn encode(self, frame: &Frame) -> Result<Bytes> {
        let bytes = match self {
            Serializer::Json => JsonCodec::encode(frame)?,
            Serializer::MsgPack => MsgPackCodec::encode(frame)?,
        };
        Ok(Bytes::from(bytes))
    }

    /// Parse transport bytes into a frame.
    ///
    /// # Errors
    ///
    /// Returns a codec error for undecodable bytes and `MalformedFrame` when
    /// the value is not an array led by an unsigned integer code.
    pub fn decode(self, raw: &[u8]) -> Result<Frame> {
        let value: Value = match self {
            Serializer::Json => JsonCodec::decode(raw)?,
            Serializer::MsgPack => MsgPackCodec::decode(raw)?,
        };
        Frame::try_from(value)
    }
}
