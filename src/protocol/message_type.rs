//! Message kind registry.
//!
//! Closed table of the WAMP v2 message kinds, their integer wire codes and
//! the ordered field schema carried after the code:
//!
//! ```text
//! [CODE, field_1, field_2, ..., optional_1?, optional_2?]
//! ```
//!
//! Codes are non-contiguous (1-8, 16-17, 32-36, 48-50, 64-70). Lookups in
//! both directions are total over the table and return `None` outside it.
//!
//! # Example
//!
//! ```
//! use wamp_core::protocol::{code_of, name_of, MessageKind};
//!
//! assert_eq!(code_of("CALL"), Some(48));
//! assert_eq!(name_of(48), Some("CALL"));
//! assert_eq!(name_of(9), None);
//! assert_eq!(MessageKind::from_code(2), Some(MessageKind::Welcome));
//! ```

use std::fmt;

/// One named slot in a message kind's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as used in the WAMP documentation.
    pub name: &'static str,
    /// Optional trailing field (emitted only when supplied).
    pub optional: bool,
}

const fn req(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        optional: false,
    }
}

const fn opt(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        optional: true,
    }
}

const HELLO: &[FieldSpec] = &[req("realm"), req("details")];
const WELCOME: &[FieldSpec] = &[req("session"), req("details")];
const ABORT: &[FieldSpec] = &[req("details"), req("reason")];
const CHALLENGE: &[FieldSpec] = &[req("challenge"), req("extra")];
const AUTHENTICATE: &[FieldSpec] = &[req("signature"), req("extra")];
// Order as a client sends it; a server sends `reason` first.
const GOODBYE: &[FieldSpec] = &[req("details"), req("reason")];
const HEARTBEAT: &[FieldSpec] = &[req("incoming_seq"), req("outgoing_seq"), opt("discard")];
const ERROR: &[FieldSpec] = &[
    req("request_type"),
    req("request_id"),
    req("details"),
    req("error"),
    opt("arguments"),
    opt("arguments_kw"),
];
const PUBLISH: &[FieldSpec] = &[
    req("request_id"),
    req("options"),
    req("topic_uri"),
    opt("arguments"),
    opt("arguments_kw"),
];
const PUBLISHED: &[FieldSpec] = &[req("request_id"), req("publication_id")];
const SUBSCRIBE: &[FieldSpec] = &[req("request_id"), req("options"), req("topic_uri")];
const SUBSCRIBED: &[FieldSpec] = &[req("request_id"), req("subscription_id")];
const UNSUBSCRIBE: &[FieldSpec] = &[req("request_id"), req("subscription_id")];
const UNSUBSCRIBED: &[FieldSpec] = &[req("request_id")];
const EVENT: &[FieldSpec] = &[
    req("subscription_id"),
    req("publication_id"),
    req("details"),
    opt("arguments"),
    opt("arguments_kw"),
];
const CALL: &[FieldSpec] = &[
    req("request_id"),
    req("options"),
    req("procedure"),
    opt("arguments"),
    opt("arguments_kw"),
];
const CANCEL: &[FieldSpec] = &[req("request_id"), req("options")];
const RESULT: &[FieldSpec] = &[
    req("request_id"),
    req("details"),
    opt("arguments"),
    opt("arguments_kw"),
];
const REGISTER: &[FieldSpec] = &[req("request_id"), req("options"), req("procedure")];
const REGISTERED: &[FieldSpec] = &[req("request_id"), req("registration_id")];
const UNREGISTER: &[FieldSpec] = &[req("request_id"), req("registration_id")];
const UNREGISTERED: &[FieldSpec] = &[req("request_id")];
const INVOCATION: &[FieldSpec] = &[
    req("request_id"),
    req("registration_id"),
    req("details"),
    opt("arguments"),
    opt("arguments_kw"),
];
const INTERRUPT: &[FieldSpec] = &[req("request_id"), req("options")];
const YIELD: &[FieldSpec] = &[
    req("request_id"),
    req("options"),
    opt("arguments"),
    opt("arguments_kw"),
];

/// WAMP v2 message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Hello,
    Welcome,
    Abort,
    Challenge,
    Authenticate,
    Goodbye,
    Heartbeat,
    Error,
    Publish,
    Published,
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Event,
    Call,
    Cancel,
    Result,
    Register,
    Registered,
    Unregister,
    Unregistered,
    Invocation,
    Interrupt,
    Yield,
}

impl MessageKind {
    /// Every registered kind, ordered by wire code.
    pub const ALL: [MessageKind; 25] = [
        MessageKind::Hello,
        MessageKind::Welcome,
        MessageKind::Abort,
        MessageKind::Challenge,
        MessageKind::Authenticate,
        MessageKind::Goodbye,
        MessageKind::Heartbeat,
        MessageKind::Error,
        MessageKind::Publish,
        MessageKind::Published,
        MessageKind::Subscribe,
        MessageKind::Subscribed,
        MessageKind::Unsubscribe,
        MessageKind::Unsubscribed,
        MessageKind::Event,
        MessageKind::Call,
        MessageKind::Cancel,
        MessageKind::Result,
        MessageKind::Register,
        MessageKind::Registered,
        MessageKind::Unregister,
        MessageKind::Unregistered,
        MessageKind::Invocation,
        MessageKind::Interrupt,
        MessageKind::Yield,
    ];

    /// Integer wire code.
    pub const fn code(self) -> u64 {
        match self {
            MessageKind::Hello => 1,
            MessageKind::Welcome => 2,
            MessageKind::Abort => 3,
            MessageKind::Challenge => 4,
            MessageKind::Authenticate => 5,
            MessageKind::Goodbye => 6,
            MessageKind::Heartbeat => 7,
            MessageKind::Error => 8,
            MessageKind::Publish => 16,
            MessageKind::Published => 17,
            MessageKind::Subscribe => 32,
            MessageKind::Subscribed => 33,
            MessageKind::Unsubscribe => 34,
            MessageKind::Unsubscribed => 35,
            MessageKind::Event => 36,
            MessageKind::Call => 48,
            MessageKind::Cancel => 49,
            MessageKind::Result => 50,
            MessageKind::Register => 64,
            MessageKind::Registered => 65,
            MessageKind::Unregister => 66,
            MessageKind::Unregistered => 67,
            MessageKind::Invocation => 68,
            MessageKind::Interrupt => 69,
            MessageKind::Yield => 70,
        }
    }

    /// Resolve a wire code. Returns `None` for unregistered codes.
    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Upper-case protocol name, e.g. `"HELLO"`.
    pub const fn name(self) -> &'static str {
        match self {
            MessageKind::Hello => "HELLO",
            MessageKind::Welcome => "WELCOME",
            MessageKind::Abort => "ABORT",
            MessageKind::Challenge => "CHALLENGE",
            MessageKind::Authenticate => "AUTHENTICATE",
            MessageKind::Goodbye => "GOODBYE",
            MessageKind::Heartbeat => "HEARTBEAT",
            MessageKind::Error => "ERROR",
            MessageKind::Publish => "PUBLISH",
            MessageKind::Published => "PUBLISHED",
            MessageKind::Subscribe => "SUBSCRIBE",
            MessageKind::Subscribed => "SUBSCRIBED",
            MessageKind::Unsubscribe => "UNSUBSCRIBE",
            MessageKind::Unsubscribed => "UNSUBSCRIBED",
            MessageKind::Event => "EVENT",
            MessageKind::Call => "CALL",
            MessageKind::Cancel => "CANCEL",
            MessageKind::Result => "RESULT",
            MessageKind::Register => "REGISTER",
            MessageKind::Registered => "REGISTERED",
            MessageKind::Unregister => "UNREGISTER",
            MessageKind::Unregistered => "UNREGISTERED",
            MessageKind::Invocation => "INVOCATION",
            MessageKind::Interrupt => "INTERRUPT",
            MessageKind::Yield => "YIELD",
        }
    }

    /// Lower-case event name handlers are bound under, e.g. `"hello"`.
    pub fn event_name(self) -> &'static str {
        match self {
            MessageKind::Hello => "hello",
            MessageKind::Welcome => "welcome",
            MessageKind::Abort => "abort",
            MessageKind::Challenge => "challenge",
            MessageKind::Authenticate => "authenticate",
            MessageKind::Goodbye => "goodbye",
            MessageKind::Heartbeat => "heartbeat",
            MessageKind::Error => "error",
            MessageKind::Publish => "publish",
            MessageKind::Published => "published",
            MessageKind::Subscribe => "subscribe",
            MessageKind::Subscribed => "subscribed",
            MessageKind::Unsubscribe => "unsubscribe",
            MessageKind::Unsubscribed => "unsubscribed",
            MessageKind::Event => "event",
            MessageKind::Call => "call",
            MessageKind::Cancel => "cancel",
            MessageKind::Result => "result",
            MessageKind::Register => "register",
            MessageKind::Registered => "registered",
            MessageKind::Unregister => "unregister",
            MessageKind::Unregistered => "unregistered",
            MessageKind::Invocation => "invocation",
            MessageKind::Interrupt => "interrupt",
            MessageKind::Yield => "yield",
        }
    }

    /// Resolve a name in either spelling (`"CALL"` or `"call"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.event_name() == name)
    }

    /// Ordered payload schema (excluding the leading code).
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            MessageKind::Hello => HELLO,
            MessageKind::Welcome => WELCOME,
            MessageKind::Abort => ABORT,
            MessageKind::Challenge => CHALLENGE,
            MessageKind::Authenticate => AUTHENTICATE,
            MessageKind::Goodbye => GOODBYE,
            MessageKind::Heartbeat => HEARTBEAT,
            MessageKind::Error => ERROR,
            MessageKind::Publish => PUBLISH,
            MessageKind::Published => PUBLISHED,
            MessageKind::Subscribe => SUBSCRIBE,
            MessageKind::Subscribed => SUBSCRIBED,
            MessageKind::Unsubscribe => UNSUBSCRIBE,
            MessageKind::Unsubscribed => UNSUBSCRIBED,
            MessageKind::Event => EVENT,
            MessageKind::Call => CALL,
            MessageKind::Cancel => CANCEL,
            MessageKind::Result => RESULT,
            MessageKind::Register => REGISTER,
            MessageKind::Registered => REGISTERED,
            MessageKind::Unregister => UNREGISTER,
            MessageKind::Unregistered => UNREGISTERED,
            MessageKind::Invocation => INVOCATION,
            MessageKind::Interrupt => INTERRUPT,
            MessageKind::Yield => YIELD,
        }
    }

    /// Number of fields that are always present.
    pub fn fixed_len(self) -> usize {
        self.fields().iter().filter(|f| !f.optional).count()
    }

    /// Position of a named field within the payload.
    pub fn field_index(self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wire code for an upper-case kind name.
pub fn code_of(name: &str) -> Option<u64> {
    MessageKind::ALL
        .into_iter()
        .find(|kind| kind.name() == name)
        .map(MessageKind::code)
}

/// Upper-case kind name for a wire code.
pub fn name_of(code: u64) -> Option<&'static str> {
    MessageKind::from_code(code).map(MessageKind::name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_match_wire_table() {
        assert_eq!(MessageKind::Hello.code(), 1);
        assert_eq!(MessageKind::Error.code(), 8);
        assert_eq!(MessageKind::Publish.code(), 16);
        assert_eq!(MessageKind::Event.code(), 36);
        assert_eq!(MessageKind::Call.code(), 48);
        assert_eq!(MessageKind::Yield.code(), 70);
    }

    #[test]
    fn test_code_name_bijection() {
        let mut codes = HashSet::new();
        let mut names = HashSet::new();

        for kind in MessageKind::ALL {
            assert!(codes.insert(kind.code()), "duplicate code {}", kind.code());
            assert!(names.insert(kind.name()), "duplicate name {}", kind.name());

            assert_eq!(name_of(kind.code()), Some(kind.name()));
            assert_eq!(code_of(kind.name()), Some(kind.code()));
        }
    }

    #[test]
    fn test_unknown_code_is_absent() {
        for code in [0u64, 9, 15, 18, 31, 37, 47, 51, 63, 71, 1000, u64::MAX] {
            assert_eq!(name_of(code), None);
            assert_eq!(MessageKind::from_code(code), None);
        }
    }

    #[test]
    fn test_unknown_name_is_absent() {
        assert_eq!(code_of("PING"), None);
        assert_eq!(code_of("hello"), None);
        assert_eq!(MessageKind::from_name("ping"), None);
    }

    #[test]
    fn test_from_name_accepts_both_spellings() {
        assert_eq!(MessageKind::from_name("YIELD"), Some(MessageKind::Yield));
        assert_eq!(MessageKind::from_name("yield"), Some(MessageKind::Yield));
    }

    #[test]
    fn test_all_is_ordered_by_code() {
        let codes: Vec<u64> = MessageKind::ALL.iter().map(|k| k.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_optional_fields_are_trailing() {
        for kind in MessageKind::ALL {
            let fields = kind.fields();
            let first_optional = fields.iter().position(|f| f.optional);
            if let Some(start) = first_optional {
                assert!(
                    fields[start..].iter().all(|f| f.optional),
                    "{kind} has a required field after an optional one"
                );
            }
        }
    }

    #[test]
    fn test_field_index() {
        assert_eq!(MessageKind::Error.field_index("arguments_kw"), Some(5));
        assert_eq!(MessageKind::Hello.field_index("realm"), Some(0));
        assert_eq!(MessageKind::Hello.field_index("procedure"), None);
        assert_eq!(MessageKind::Error.fixed_len(), 4);
        assert_eq!(MessageKind::Heartbeat.fixed_len(), 2);
    }
}
