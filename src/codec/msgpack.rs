//! MsgPack codec using `rmp-serde` (`wamp.2.msgpack`).
//!
//! WAMP frames are positional arrays, so values are written with `to_vec`
//! and structs, if any reach this codec, stay arrays rather than maps.
//!
//! # Example
//!
//! ```
//! use wamp_core::codec::MsgPackCodec;
//! use serde_json::{json, Value};
//!
//! let encoded = MsgPackCodec::encode(&json!([1, "realm1", {}])).unwrap();
//! let decoded: Value = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, json!([1, "realm1", {}]));
//! ```

use crate::error::Result;

/// MessagePack codec for frames.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
