//! Event router for dispatching events to bound handlers.
//!
//! The router maps `(role, event)` to at most one handler. Binding checks
//! the event against the role's whitelist; re-binding an already bound event
//! replaces the previous handler (last bind wins, nothing accumulates).
//!
//! Handlers are stored as `Arc<dyn Handler>` behind a read-mostly lock.
//! `trigger` clones the handler out and releases the lock before calling it,
//! so a concurrent `bind` never exposes a half-updated table and a handler
//! may itself bind.
//!
//! # Example
//!
//! ```
//! use wamp_core::handler::EventRouter;
//! use wamp_core::protocol::Role;
//!
//! let router = EventRouter::new();
//! router.bind(Role::Server, "subscribe", |_ctx| Ok(())).unwrap();
//!
//! let err = router.bind(Role::Server, "invalid", |_ctx| Ok(())).unwrap_err();
//! assert_eq!(err.to_string(), "Invalid binding: invalid");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::EventContext;
use crate::error::{Result, WampError};
use crate::protocol::{Event, Role};

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Trait for event handlers.
pub trait Handler: Send + Sync + 'static {
    /// Handle one triggered event.
    fn call(&self, ctx: &EventContext) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&EventContext) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, ctx: &EventContext) -> HandlerResult {
        self(ctx)
    }
}

/// Role-scoped table of event handlers.
#[derive(Default)]
pub struct EventRouter {
    bindings: RwLock<HashMap<(Role, Event), Arc<dyn Handler>>>,
}

impl EventRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler by external event name (`"hello"`, `"connect"`, ...).
    ///
    /// # Errors
    ///
    /// Returns `InvalidBinding` naming the event if it is not on the role's
    /// whitelist.
    pub fn bind<F>(&self, role: Role, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&EventContext) -> HandlerResult + Send + Sync + 'static,
    {
        let event = Event::from_name(name)
            .filter(|event| role.accepts(*event))
            .ok_or_else(|| WampError::InvalidBinding {
                role,
                event: name.to_string(),
            })?;
        self.bind_event(role, event, handler)
    }

    /// Bind a closure to a typed event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBinding` if the role does not accept `event`.
    pub fn bind_event<F>(&self, role: Role, event: Event, handler: F) -> Result<()>
    where
        F: Fn(&EventContext) -> HandlerResult + Send + Sync + 'static,
    {
        self.bind_shared(role, event, Arc::new(handler))
    }

    /// Bind any [`Handler`] implementation to a typed event.
    pub fn bind_handler<H: Handler>(&self, role: Role, event: Event, handler: H) -> Result<()> {
        self.bind_shared(role, event, Arc::new(handler))
    }

    pub(crate) fn bind_shared(
        &self,
        role: Role,
        event: Event,
        handler: Arc<dyn Handler>,
    ) -> Result<()> {
        if !role.accepts(event) {
            return Err(WampError::InvalidBinding {
                role,
                event: event.name().to_string(),
            });
        }

        self.bindings.write().insert((role, event), handler);
        Ok(())
    }

    /// Remove the handler for an event. Returns whether one was bound.
    pub fn unbind(&self, role: Role, event: Event) -> bool {
        self.bindings.write().remove(&(role, event)).is_some()
    }

    /// Whether a handler is bound for `event`.
    pub fn is_bound(&self, role: Role, event: Event) -> bool {
        self.bindings.read().contains_key(&(role, event))
    }

    /// Invoke the handler bound for `event`, if any.
    ///
    /// Returns `Ok(false)` without doing anything when nothing is bound.
    /// Otherwise returns `Ok(true)` or the handler's error.
    pub fn trigger(&self, role: Role, event: Event, ctx: &EventContext) -> Result<bool> {
        let handler = match self.bindings.read().get(&(role, event)) {
            Some(handler) => handler.clone(),
            None => return Ok(false),
        };

        handler.call(ctx)?;
        Ok(true)
    }
}
