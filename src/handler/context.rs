//! Context handed to event handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::outbound::Outbound;
use crate::protocol::{Event, Fields, MessageKind};
use crate::session::Session;

/// What a handler sees when its event fires.
///
/// `connect` and `disconnect` carry no fields. Message events carry the
/// decoded fields in schema order, with `None` for absent optionals.
///
/// `EventContext` is `Clone`, so a handler can move it into a spawned task
/// and reply later.
#[derive(Clone)]
pub struct EventContext {
    event: Event,
    session: Arc<Session>,
    fields: Fields,
    outbound: Outbound,
}

impl EventContext {
    pub(crate) fn new(
        event: Event,
        session: Arc<Session>,
        fields: Fields,
        outbound: Outbound,
    ) -> Self {
        Self {
            event,
            session,
            fields,
            outbound,
        }
    }

    /// Event that fired.
    #[inline]
    pub fn event(&self) -> Event {
        self.event
    }

    /// Message kind, or `None` for lifecycle events.
    pub fn kind(&self) -> Option<MessageKind> {
        match self.event {
            Event::Message(kind) => Some(kind),
            Event::Connect | Event::Disconnect => None,
        }
    }

    /// Session the event belongs to.
    #[inline]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Decoded fields in schema order.
    #[inline]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Field by schema name, e.g. `"realm"` or `"request_id"`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.named(self.kind()?, name)
    }

    /// Field by position (0 = first field after the code).
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Sender for replies.
    #[inline]
    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    /// Send a frame to this context's session.
    pub fn send(&self, kind: MessageKind, fields: Fields) -> Result<()> {
        self.outbound.send(&self.session, kind, fields)
    }
}

impl std::fmt::Debug for EventContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventContext")
            .field("event", &self.event)
            .field("session", &self.session.id())
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::tests::context_for;
    use serde_json::json;

    #[test]
    fn test_field_by_name() {
        let ctx = context_for(
            Event::Message(MessageKind::Subscribe),
            Fields::present([json!(7), json!({}), json!("com.example.topic")]),
        );

        assert_eq!(ctx.kind(), Some(MessageKind::Subscribe));
        assert_eq!(ctx.field("request_id"), Some(&json!(7)));
        assert_eq!(ctx.field("topic_uri"), Some(&json!("com.example.topic")));
        assert_eq!(ctx.field("nonexistent"), None);
        assert_eq!(ctx.get(1), Some(&json!({})));
    }

    #[test]
    fn test_absent_optional_field() {
        let ctx = context_for(
            Event::Message(MessageKind::Publish),
            Fields::present([json!(1), json!({}), json!("t")]).without(),
        );

        assert_eq!(ctx.field("arguments"), None);
        assert_eq!(ctx.get(3), None);
    }

    #[test]
    fn test_lifecycle_event_has_no_fields() {
        let ctx = context_for(Event::Connect, Fields::new());

        assert_eq!(ctx.kind(), None);
        assert!(ctx.fields().is_empty());
        assert_eq!(ctx.field("realm"), None);
    }
}
