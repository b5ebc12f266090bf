//! Frame classification for the transport layer.
//!
//! - Text frames within the size limit => raw text for the event router
//! - Oversized text and binary frames => dropped by the session loop
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;

#[derive(Debug)]
pub enum Inbound {
    Text(String),
    Oversized { bytes_len: usize },
    Binary { bytes_len: usize },
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn decode(msg: Message, max_message_bytes: usize) -> Inbound {
    match msg {
        Message::Text(s) if s.len() > max_message_bytes => Inbound::Oversized {
            bytes_len: s.len(),
        },
        Message::Text(s) => Inbound::Text(s),
        Message::Binary(b) => Inbound::Binary { bytes_len: b.len() },
        Message::Ping(v) => Inbound::Ping(v),
        Message::Pong(_) => Inbound::Pong,
        Message::Close(_) => Inbound::Close,
    }
}
