//! Wire protocol.
//!
//! A text message is `<event><payload>` with no separator. The event name is
//! everything before the first `{` or `[`; the payload is the rest and must be
//! a JSON array or object.

pub mod frame;

/// Characters that open a payload and therefore can never appear in an event name.
pub const PAYLOAD_MARKERS: [char; 2] = ['{', '['];

/// True if `event` can be routed: non-empty and free of payload markers.
pub fn is_valid_event_name(event: &str) -> bool {
    !event.is_empty() && !event.contains(&PAYLOAD_MARKERS[..])
}
