//! eventsocket gateway library entry.
//!
//! Wires the event router, connection table, and axum websocket transport
//! into a server. Application code registers listeners on an [`EventRouter`],
//! then hands it to [`server::serve`].

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod realtime;
pub mod router;
pub mod server;
pub mod transport;

pub use dispatch::{
    handler_fn, DispatchOutcome, EventHandler, EventRouter, MessageOutcome, NamedEventHandler,
    RouterHooks,
};
pub use realtime::{ConnState, Connection, ConnectionId};
