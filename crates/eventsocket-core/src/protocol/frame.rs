//! `<event><json>` framing (panic-free).
//!
//! Parsing rules:
//! - Split at the first `{` or `[`; never index past what `find` returned.
//! - The payload is parsed as a whole JSON document, so trailing garbage fails.
//! - `encode` trusts its caller; `parse` is the untrusted boundary.

use serde::Serialize;
use serde_json::Value;

use crate::error::{EventSocketError, FormatError, Result};
use crate::protocol::PAYLOAD_MARKERS;

/// A parsed inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Event name (never empty, never contains `{` or `[`).
    pub event: String,
    /// JSON array or object.
    pub payload: Value,
}

impl Frame {
    /// Re-encode this frame into wire text.
    pub fn encode(&self) -> String {
        encode(&self.event, &self.payload)
    }
}

/// Parse one raw text message.
pub fn parse(raw: &str) -> std::result::Result<Frame, FormatError> {
    let at = raw
        .find(&PAYLOAD_MARKERS[..])
        .ok_or(FormatError::NoPayloadMarker)?;
    if at == 0 {
        return Err(FormatError::EmptyEvent);
    }

    let (event, body) = raw.split_at(at);
    // A document that starts with `{`/`[` can only be an object or an array.
    let payload: Value =
        serde_json::from_str(body).map_err(|e| FormatError::InvalidJson(e.to_string()))?;

    Ok(Frame {
        event: event.to_owned(),
        payload,
    })
}

/// Encode an event and its payload into wire text.
///
/// The caller guarantees `event` holds no payload marker. `Value`'s default
/// map is ordered, so the output is deterministic.
pub fn encode(event: &str, payload: &Value) -> String {
    let mut out = String::with_capacity(event.len() + 32);
    out.push_str(event);
    out.push_str(&payload.to_string());
    out
}

/// Serialize an application value into a payload, rejecting scalars.
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let v = serde_json::to_value(value)
        .map_err(|e| EventSocketError::Internal(format!("json encode failed: {e}")))?;
    match v {
        Value::Array(_) | Value::Object(_) => Ok(v),
        _ => Err(FormatError::ScalarPayload.into()),
    }
}
