#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Serialize;
use serde_json::json;

use eventsocket_core::protocol::{frame, is_valid_event_name};
use eventsocket_core::{EventSocketError, FormatError};

#[test]
fn encode_has_no_separator() {
    let raw = frame::encode("memes", &json!({"foo": "bar"}));
    assert_eq!(raw, r#"memes{"foo":"bar"}"#);
}

#[test]
fn parse_inverts_encode() {
    let events = ["memes", "#!@c", "a", "with space", "ünïcode"];
    let payloads = [
        json!({}),
        json!([]),
        json!({"foo": "bar", "n": [1, 2.5, null, true]}),
        json!(["test", {"is": ["a", 4]}]),
        json!([{"nested": {"deep": ["{", "[", "}"]}}]),
    ];

    for e in events {
        for p in &payloads {
            let raw = frame::encode(e, p);
            let f = frame::parse(&raw).unwrap();
            assert_eq!(f.event, e, "raw={raw}");
            assert_eq!(&f.payload, p, "raw={raw}");
            assert_eq!(f.encode(), raw);
        }
    }
}

#[test]
fn strings_without_markers_never_parse() {
    for s in ["", "hello", "42", "null", "true", "\"quoted\"", "x}", "y]", "   "] {
        assert_eq!(frame::parse(s), Err(FormatError::NoPayloadMarker), "input={s:?}");
    }
}

#[test]
fn parse_is_deterministic() {
    let raw = "chat{\"a\":";
    assert_eq!(frame::parse(raw), frame::parse(raw));
    assert!(matches!(frame::parse(raw), Err(FormatError::InvalidJson(_))));
}

#[test]
fn event_name_validity() {
    assert!(is_valid_event_name("memes"));
    assert!(is_valid_event_name("#!@c"));
    assert!(!is_valid_event_name(""));
    assert!(!is_valid_event_name("a{b"));
    assert!(!is_valid_event_name("a[b"));
}

#[derive(Serialize)]
struct Move {
    x: i32,
    y: i32,
}

#[test]
fn to_payload_accepts_composites_only() {
    assert_eq!(frame::to_payload(&Move { x: 1, y: 2 }).unwrap(), json!({"x": 1, "y": 2}));
    assert_eq!(frame::to_payload(&vec![1, 2]).unwrap(), json!([1, 2]));

    let err = frame::to_payload(&5).unwrap_err();
    assert!(matches!(err, EventSocketError::Format(FormatError::ScalarPayload)));
    assert_eq!(err.code(), "FORMAT");
    assert!(err.is_recoverable());
}
