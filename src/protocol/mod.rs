//! Protocol module - message kinds, roles, frames and the frame codec.
//!
//! This module implements the positional WAMP v2 message layer:
//! - Closed registry of message kinds and their wire codes
//! - Per-kind field schema with optional trailing fields
//! - Frame and field containers
//! - Role whitelists for inbound events and outbound kinds

mod codec;
mod frame;
mod message_type;
mod role;

pub use codec::FrameCodec;
pub use frame::{Fields, Frame};
pub use message_type::{code_of, name_of, FieldSpec, MessageKind};
pub use role::{Event, Role};
