//! Handler module - event binding and dispatch.
//!
//! Provides:
//! - [`EventRouter`] - maps `(role, event)` to one handler
//! - [`EventContext`] - what a handler sees: session, fields and a reply path
//!
//! # Example
//!
//! ```
//! use wamp_core::handler::{EventContext, EventRouter};
//! use wamp_core::protocol::{Event, MessageKind, Role};
//!
//! let router = EventRouter::new();
//! router
//!     .bind(Role::Server, "hello", |ctx: &EventContext| {
//!         println!("realm: {:?}", ctx.field("realm"));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! assert!(router.is_bound(Role::Server, Event::Message(MessageKind::Hello)));
//! ```

mod context;
mod router;

pub use context::EventContext;
pub use router::{EventRouter, Handler, HandlerResult};
