//! Connection handles and the live connection table.
//!
//! A [`Connection`] is what handlers receive and what application code emits
//! through. The [`ConnectionRegistry`] issues ids and owns the live set.

mod connection;
mod registry;

pub use connection::{ConnState, Connection, ConnectionId};
pub use registry::ConnectionRegistry;
