//! Top-level facade crate for eventsocket.
//!
//! Re-exports the codec and the gateway library so users can depend on a single crate.

pub mod core {
    pub use eventsocket_core::*;
}

pub mod gateway {
    pub use eventsocket_gateway::*;
}
