//! Event routing.
//!
//! Re-exports the router and handler traits so downstream consumers can
//! depend on this module directly.

pub mod handler;
pub mod router;

pub use handler::{handler_fn, EventHandler, NamedEventHandler};
pub use router::{ConnectionHook, DispatchOutcome, EventRouter, MessageOutcome, RouterHooks};
