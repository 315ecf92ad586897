//! Frame codec: `(kind, fields)` to and from positional frames.
//!
//! Fixed fields are always emitted. An optional trailing field is emitted
//! only when it was supplied. When an earlier optional field is absent but a
//! later one is supplied, the later field keeps its declared offset and the
//! earlier slot is filled with a `null` placeholder (a "hole"):
//!
//! ```text
//! ERROR, arguments absent, arguments_kw supplied:
//! [8, request_type, request_id, details, error, null, {..kw..}]
//!                                               ^^^^ hole
//! ```
//!
//! Peers that compact the array instead would read `arguments_kw` as
//! `arguments`; the hole keeps offsets stable at the cost of a `null` that
//! strict WAMP routers expect to be `[]`.
//!
//! On decode, positions past the frame's end are reported absent, and a
//! `null` in an optional slot that is followed by a later element is read
//! back as the hole it was written as.

use serde_json::Value;

use super::{Fields, Frame, MessageKind};
use crate::error::{Result, WampError};

/// Stateless frame codec.
pub struct FrameCodec;

impl FrameCodec {
    /// Encode `fields` for `kind` into a frame.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFrame` if a fixed field is absent or more fields
    /// are supplied than the kind declares.
    pub fn encode(kind: MessageKind, fields: &Fields) -> Result<Frame> {
        let schema = kind.fields();

        if fields.len() > schema.len() {
            // Extra slots are fine only if none of them carry a value.
            if (schema.len()..fields.len()).any(|i| fields.is_present(i)) {
                return Err(WampError::MalformedFrame(format!(
                    "{kind} takes {} fields, got {}",
                    schema.len(),
                    fields.len()
                )));
            }
        }

        // Last position that must be written: every fixed field, plus the
        // furthest supplied optional one.
        let mut end = kind.fixed_len();
        for (index, spec) in schema.iter().enumerate() {
            let present = fields.is_present(index);
            if !spec.optional && !present {
                return Err(WampError::MalformedFrame(format!(
                    "{kind} is missing required field `{}`",
                    spec.name
                )));
            }
            if spec.optional && present {
                end = index + 1;
            }
        }

        let payload = (0..end)
            .map(|index| fields.get(index).cloned().unwrap_or(Value::Null))
            .collect();

        Ok(Frame::new(kind.code(), payload))
    }

    /// Decode a frame into its kind and payload slots.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMessageType` for unregistered codes and
    /// `MalformedFrame` when the frame is longer than the kind's schema.
    pub fn decode(frame: &Frame) -> Result<(MessageKind, Fields)> {
        let kind = frame
            .kind()
            .ok_or(WampError::UnknownMessageType(frame.code()))?;
        let schema = kind.fields();
        let payload = frame.payload();

        if payload.len() > schema.len() {
            return Err(WampError::MalformedFrame(format!(
                "{kind} takes {} fields, got {}",
                schema.len(),
                payload.len()
            )));
        }

        let last = payload.len().saturating_sub(1);
        let fields = schema
            .iter()
            .enumerate()
            .map(|(index, spec)| match payload.get(index) {
                Some(Value::Null) if spec.optional && index < last => None,
                Some(value) => Some(value.clone()),
                None => None,
            })
            .collect();

        Ok((kind, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_fixed_fields_only() {
        let fields = Fields::present([json!("realm1"), json!({})]);
        let frame = FrameCodec::encode(MessageKind::Hello, &fields).unwrap();
        assert_eq!(frame.into_value(), json!([1, "realm1", {}]));
    }

    #[test]
    fn test_encode_omits_absent_optional() {
        let fields = Fields::present([json!(7), json!({})]).without().without();
        let frame = FrameCodec::encode(MessageKind::Result, &fields).unwrap();
        assert_eq!(frame.into_value(), json!([50, 7, {}]));
    }

    #[test]
    fn test_encode_keeps_falsy_optional() {
        // Supplied but falsy values are still present
        let fields = Fields::present([json!(1), json!(2), json!(0)]);
        let frame = FrameCodec::encode(MessageKind::Heartbeat, &fields).unwrap();
        assert_eq!(frame.into_value(), json!([7, 1, 2, 0]));

        let fields = Fields::present([json!(7), json!({}), json!([])]);
        let frame = FrameCodec::encode(MessageKind::Result, &fields).unwrap();
        assert_eq!(frame.into_value(), json!([50, 7, {}, []]));
    }

    #[test]
    fn test_encode_leaves_hole_for_absent_earlier_optional() {
        let fields = Fields::present([json!(48), json!(7), json!({}), json!("app.error")])
            .without()
            .with(json!({"reason": "x"}));
        let frame = FrameCodec::encode(MessageKind::Error, &fields).unwrap();

        assert_eq!(frame.len(), 7);
        assert_eq!(
            frame.into_value(),
            json!([8, 48, 7, {}, "app.error", null, {"reason": "x"}])
        );
    }

    #[test]
    fn test_encode_missing_required_field() {
        let fields = Fields::present([json!("realm1")]);
        let result = FrameCodec::encode(MessageKind::Hello, &fields);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("missing required field `details`"));
    }

    #[test]
    fn test_encode_too_many_fields() {
        let fields = Fields::present([json!(1), json!(2), json!(3)]);
        let result = FrameCodec::encode(MessageKind::Published, &fields);
        assert!(matches!(result, Err(WampError::MalformedFrame(_))));

        // Trailing absent slots are harmless
        let fields = Fields::present([json!(1), json!(2)]).without();
        assert!(FrameCodec::encode(MessageKind::Published, &fields).is_ok());
    }

    #[test]
    fn test_decode_full_frame() {
        let frame = Frame::try_from(json!([48, 7, {}, "echo", ["x"], {"k": 1}])).unwrap();
        let (kind, fields) = FrameCodec::decode(&frame).unwrap();

        assert_eq!(kind, MessageKind::Call);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields.named(kind, "procedure"), Some(&json!("echo")));
        assert_eq!(fields.named(kind, "arguments"), Some(&json!(["x"])));
        assert_eq!(fields.named(kind, "arguments_kw"), Some(&json!({"k": 1})));
    }

    #[test]
    fn test_decode_short_frame_reports_absent() {
        let frame = Frame::try_from(json!([48, 7, {}, "echo"])).unwrap();
        let (_, fields) = FrameCodec::decode(&frame).unwrap();

        assert_eq!(fields.len(), 5);
        assert!(!fields.is_present(3));
        assert!(!fields.is_present(4));
    }

    #[test]
    fn test_decode_missing_fixed_field_is_absent_not_error() {
        let frame = Frame::try_from(json!([1, "realm1"])).unwrap();
        let (kind, fields) = FrameCodec::decode(&frame).unwrap();
        assert_eq!(kind, MessageKind::Hello);
        assert_eq!(fields.get(1), None);
    }

    #[test]
    fn test_decode_hole_reads_as_absent() {
        let frame =
            Frame::try_from(json!([8, 48, 7, {}, "app.error", null, {"reason": "x"}])).unwrap();
        let (_, fields) = FrameCodec::decode(&frame).unwrap();

        assert!(!fields.is_present(4));
        assert_eq!(fields.get(5), Some(&json!({"reason": "x"})));
    }

    #[test]
    fn test_decode_trailing_null_is_present() {
        let frame = Frame::try_from(json!([7, 1, 2, null])).unwrap();
        let (_, fields) = FrameCodec::decode(&frame).unwrap();
        assert_eq!(fields.get(2), Some(&Value::Null));
    }

    #[test]
    fn test_present_null_before_later_slot_reads_as_absent() {
        let fields = Fields::present([json!(48), json!(7), json!({}), json!("app.error")])
            .with(Value::Null)
            .with(json!({"reason": "x"}));
        let frame = FrameCodec::encode(MessageKind::Error, &fields).unwrap();
        let (_, decoded) = FrameCodec::decode(&frame).unwrap();

        assert!(!decoded.is_present(4));
        assert_eq!(decoded.get(5), Some(&json!({"reason": "x"})));
    }

    #[test]
    fn test_decode_unknown_type() {
        let frame = Frame::try_from(json!([9, "x"])).unwrap();
        let result = FrameCodec::decode(&frame);
        assert!(matches!(result, Err(WampError::UnknownMessageType(9))));
    }

    #[test]
    fn test_decode_too_long() {
        let frame = Frame::try_from(json!([35, 1, 2])).unwrap();
        let result = FrameCodec::decode(&frame);
        assert!(matches!(result, Err(WampError::MalformedFrame(_))));
    }

    #[test]
    fn test_roundtrip_every_kind_fully_populated() {
        for kind in MessageKind::ALL {
            let fields: Fields = (0..kind.fields().len())
                .map(|i| Some(json!({ "slot": i })))
                .collect();

            let frame = FrameCodec::encode(kind, &fields).unwrap();
            assert_eq!(frame.len(), 1 + kind.fields().len());

            let (decoded_kind, decoded) = FrameCodec::decode(&frame).unwrap();
            assert_eq!(decoded_kind, kind);
            assert_eq!(decoded, fields);
        }
    }

    #[test]
    fn test_roundtrip_every_kind_optional_withheld() {
        for kind in MessageKind::ALL {
            let fields: Fields = kind
                .fields()
                .iter()
                .map(|spec| (!spec.optional).then(|| json!(spec.name)))
                .collect();

            let frame = FrameCodec::encode(kind, &fields).unwrap();
            assert_eq!(frame.len(), 1 + kind.fixed_len());

            let (_, decoded) = FrameCodec::decode(&frame).unwrap();
            assert_eq!(decoded, fields);
        }
    }
}
