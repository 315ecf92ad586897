//! Frame and field containers.
//!
//! A [`Frame`] is the positional wire message: element 0 is the kind's
//! integer code, the remaining elements are payload fields in schema order.
//! [`Fields`] is the decoded view of the payload where every slot is either
//! present or absent.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use wamp_core::protocol::{Fields, Frame};
//!
//! let frame = Frame::try_from(json!([1, "realm1", {}])).unwrap();
//! assert_eq!(frame.code(), 1);
//! assert_eq!(frame.payload(), &[json!("realm1"), json!({})]);
//!
//! let fields = Fields::new().with(json!(7)).without().with(json!({"k": 1}));
//! assert!(fields.is_present(0));
//! assert!(!fields.is_present(1));
//! ```

use serde::Serialize;
use serde_json::Value;

use super::MessageKind;
use crate::error::{Result, WampError};

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Frame(Vec<Value>);

impl Frame {
    /// Build a frame from a code and positional payload.
    pub fn new(code: u64, payload: Vec<Value>) -> Self {
        let mut elements = Vec::with_capacity(payload.len() + 1);
        elements.push(Value::from(code));
        elements.extend(payload);
        Self(elements)
    }

    /// Build a frame from raw elements, checking the leading code.
    pub fn from_elements(elements: Vec<Value>) -> Result<Self> {
        match elements.first() {
            None => Err(WampError::MalformedFrame("empty frame".to_string())),
            Some(first) if first.as_u64().is_none() => Err(WampError::MalformedFrame(format!(
                "message type must be an unsigned integer, got {first}"
            ))),
            Some(_) => Ok(Self(elements)),
        }
    }

    /// The leading integer code.
    #[inline]
    pub fn code(&self) -> u64 {
        // Checked in every constructor.
        self.0.first().and_then(Value::as_u64).unwrap_or_default()
    }

    /// The registered kind for this frame's code, if any.
    #[inline]
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_code(self.code())
    }

    /// Payload elements after the code.
    #[inline]
    pub fn payload(&self) -> &[Value] {
        &self.0[1..]
    }

    /// All elements including the code.
    #[inline]
    pub fn elements(&self) -> &[Value] {
        &self.0
    }

    /// Total element count including the code.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A frame always carries at least its code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Convert into a JSON array value.
    pub fn into_value(self) -> Value {
        Value::Array(self.0)
    }
}

impl TryFrom<Value> for Frame {
    type Error = WampError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(elements) => Frame::from_elements(elements),
            other => Err(WampError::MalformedFrame(format!(
                "frame must be an array, got {other}"
            ))),
        }
    }
}

impl From<Frame> for Value {
    fn from(frame: Frame) -> Self {
        frame.into_value()
    }
}

/// Ordered payload slots, each present or absent.
///
/// `Some(Value::Null)` is a present null; `None` means the caller never
/// supplied the slot. Positions past the end are absent. A present null in an
/// optional slot that precedes another present slot goes on the wire as the
/// same `null` hole an absent slot leaves, so it decodes back as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields(Vec<Option<Value>>);

impl Fields {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list where every value is present.
    pub fn present<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self(values.into_iter().map(Some).collect())
    }

    /// Append a present value.
    pub fn with(mut self, value: Value) -> Self {
        self.0.push(Some(value));
        self
    }

    /// Append an absent slot.
    pub fn without(mut self) -> Self {
        self.0.push(None);
        self
    }

    /// Append a slot that is present only when `value` is `Some`.
    pub fn with_opt(mut self, value: Option<Value>) -> Self {
        self.0.push(value);
        self
    }

    /// Push a slot in place.
    pub fn push(&mut self, value: Option<Value>) {
        self.0.push(value);
    }

    /// Value at `index`, or `None` if absent.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).and_then(Option::as_ref)
    }

    /// Whether `index` holds a supplied value.
    #[inline]
    pub fn is_present(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of slots (present or absent) tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slots are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the slots.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.0.iter().map(Option::as_ref)
    }

    /// Look up a field by its schema name for `kind`.
    pub fn named(&self, kind: MessageKind, name: &str) -> Option<&Value> {
        kind.field_index(name).and_then(|index| self.get(index))
    }

    /// Drop trailing absent slots so equal payloads compare equal.
    pub fn trimmed(mut self) -> Self {
        while matches!(self.0.last(), Some(None)) {
            self.0.pop();
        }
        self
    }
}

impl From<Vec<Option<Value>>> for Fields {
    fn from(slots: Vec<Option<Value>>) -> Self {
        Self(slots)
    }
}

impl FromIterator<Option<Value>> for Fields {
    fn from_iter<T: IntoIterator<Item = Option<Value>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
