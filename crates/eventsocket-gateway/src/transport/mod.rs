//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handlers and the codec that classifies frames before
//! text reaches the event router.

pub mod codec;
pub mod ws;
