//! eventsocket core: the `<event><json>` wire codec and the shared error type.
//!
//! This crate carries no transport or runtime dependencies. The gateway crate
//! feeds it complete text messages and hands its encoded output back to the
//! socket.
//!
//! # Panic-free
//! Panics, `unwrap`, and `expect` are compile-denied here. Every malformed
//! input surfaces as a [`FormatError`] so one bad message never takes a
//! connection down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

pub use error::{EventSocketError, FormatError, Result};
pub use protocol::frame::{encode, parse, to_payload, Frame};
