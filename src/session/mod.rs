//! Session module - protocol-level identity of connections.
//!
//! Provides:
//! - [`Session`] - identifier, transport handle, realm and lifecycle state
//! - [`SessionRegistry`] - concurrent lookup by id and by transport handle
//!
//! # Example
//!
//! ```
//! use wamp_core::session::{ConnectionId, SessionRegistry, SessionState};
//!
//! let registry = SessionRegistry::new();
//! let session = registry.create(ConnectionId::new(1));
//! assert_eq!(session.state(), SessionState::Connected);
//!
//! let removed = registry.remove_by_handle(ConnectionId::new(1)).unwrap();
//! assert_eq!(removed.id(), session.id());
//! assert!(registry.find_by_handle(ConnectionId::new(1)).is_none());
//! ```

mod registry;
mod state;

pub use registry::SessionRegistry;
pub use state::{ConnectionId, Session, SessionId, SessionState, MAX_SESSION_ID};
