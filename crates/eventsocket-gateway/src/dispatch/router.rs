use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use eventsocket_core::error::{EventSocketError, FormatError, Result};
use eventsocket_core::protocol::frame::{encode, parse, to_payload, Frame};
use eventsocket_core::protocol::is_valid_event_name;

use crate::dispatch::handler::{EventHandler, NamedEventHandler};
use crate::realtime::{ConnState, Connection, ConnectionId, ConnectionRegistry};

/// Lifecycle callback fired on open/close.
pub type ConnectionHook = Arc<dyn Fn(&Connection) + Send + Sync>;

/// Optional lifecycle hooks. A missing hook logs a warning when it would fire.
#[derive(Clone, Default)]
pub struct RouterHooks {
    pub on_open: Option<ConnectionHook>,
    pub on_close: Option<ConnectionHook>,
}

impl RouterHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl Fn(&Connection) + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn(&Connection) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }
}

/// What `dispatch` did with a parsed message. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    NoListener,
    /// The handler returned an error or panicked; the router logged it.
    HandlerFailed,
}

/// What `handle_message` did with a raw text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    Dispatched(DispatchOutcome),
    /// Malformed message, dropped. The connection stays open.
    Dropped(FormatError),
    /// The connection was not open.
    Ignored,
}

/// Event -> handler table plus the live connection set.
///
/// Listeners live in a sharded map; registration is an upsert, so the last
/// handler registered for an event wins.
pub struct EventRouter {
    listeners: DashMap<String, Arc<dyn EventHandler>>,
    connections: ConnectionRegistry,
    hooks: RouterHooks,
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new(RouterHooks::default())
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("events", &self.events())
            .field("connections", &self.connections.len())
            .finish()
    }
}

impl EventRouter {
    pub fn new(hooks: RouterHooks) -> Self {
        Self {
            listeners: DashMap::new(),
            connections: ConnectionRegistry::new(),
            hooks,
        }
    }

    // --------------------
    // Listener registration
    // --------------------

    /// Register `handler` for `event`, replacing any previous handler.
    ///
    /// Fails only for names that could never be routed (empty, or containing
    /// `{` / `[`).
    pub fn register_listener<H>(&self, event: impl Into<String>, handler: H) -> Result<()>
    where
        H: EventHandler + 'static,
    {
        self.register_shared(event.into(), Arc::new(handler))
    }

    /// Register a handler under the event name it declares itself.
    pub fn register_listener_by_self_name<H>(&self, handler: H) -> Result<()>
    where
        H: NamedEventHandler + 'static,
    {
        let event = handler.event();
        self.register_shared(event.to_owned(), Arc::new(handler))
    }

    /// Register an already shared handler, e.g. one served under several names.
    pub fn register_shared(&self, event: String, handler: Arc<dyn EventHandler>) -> Result<()> {
        if !is_valid_event_name(&event) {
            return Err(EventSocketError::InvalidRegistration(format!(
                "event name {event:?} must be non-empty and contain no '{{' or '['"
            )));
        }
        if self.listeners.insert(event.clone(), handler).is_some() {
            tracing::debug!(event = %event, "listener replaced");
        }
        Ok(())
    }

    /// Returns true if a listener was removed.
    pub fn unregister_listener(&self, event: &str) -> bool {
        self.listeners.remove(event).is_some()
    }

    pub fn has_listener(&self, event: &str) -> bool {
        self.listeners.contains_key(event)
    }

    /// Registered event names, sorted.
    pub fn events(&self) -> Vec<String> {
        let mut v: Vec<String> = self.listeners.iter().map(|e| e.key().clone()).collect();
        v.sort();
        v
    }

    // --------------------
    // Connection table
    // --------------------

    /// Add a connection to the live set and issue its id. Does not fire hooks.
    pub fn register_connection(
        &self,
        tx: mpsc::Sender<String>,
        url_param: impl Into<String>,
    ) -> Connection {
        let conn = self.connections.register(url_param.into(), tx);
        tracing::info!(conn_id = conn.id(), "registered connection");
        conn
    }

    /// Remove a connection from the live set. Absent connections are a no-op.
    pub fn remove_connection(&self, conn: &Connection) -> bool {
        let removed = self.connections.remove(conn);
        if !removed {
            tracing::debug!(conn_id = conn.id(), "remove_connection: not in live set");
        }
        removed
    }

    pub fn get_connection(&self, id: ConnectionId) -> Option<Connection> {
        self.connections.get(id)
    }

    /// Id-ordered snapshot of live connections.
    pub fn connections(&self) -> Vec<Connection> {
        self.connections.snapshot()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // --------------------
    // Lifecycle
    // --------------------

    /// Transport signalled a new connection: register, mark open, fire the open hook.
    pub fn open_connection(
        &self,
        tx: mpsc::Sender<String>,
        url_param: impl Into<String>,
    ) -> Connection {
        let url_param = url_param.into();
        tracing::info!(url_param = %url_param, "new connection established");
        let conn = self.register_connection(tx, url_param);
        conn.mark_open();
        self.on_connection_open(&conn);
        conn
    }

    /// Transport signalled termination: mark closed, remove, fire the close hook.
    ///
    /// The close hook only fires for connections that were open. A second call
    /// for the same connection does nothing.
    pub fn close_connection(&self, conn: &Connection) {
        let prev = conn.mark_closed();
        if prev == ConnState::Closed {
            return;
        }
        self.remove_connection(conn);
        if prev == ConnState::Open {
            self.on_connection_close(conn);
        }
        tracing::info!(conn_id = conn.id(), received = conn.received(), "disconnected");
    }

    pub fn on_connection_open(&self, conn: &Connection) {
        match &self.hooks.on_open {
            Some(hook) => hook(conn),
            None => tracing::warn!(conn_id = conn.id(), "open hook undefined, not triggering it"),
        }
    }

    pub fn on_connection_close(&self, conn: &Connection) {
        match &self.hooks.on_close {
            Some(hook) => hook(conn),
            None => tracing::warn!(conn_id = conn.id(), "close hook undefined, not triggering it"),
        }
    }

    // --------------------
    // Inbound
    // --------------------

    /// Route one parsed message. Handler failures are logged, never returned.
    pub async fn dispatch(
        &self,
        event: &str,
        payload: Value,
        conn: &Connection,
    ) -> DispatchOutcome {
        let Some(handler) = self.listeners.get(event).map(|h| Arc::clone(h.value())) else {
            let e = EventSocketError::UnknownEvent(event.to_owned());
            tracing::warn!(
                conn_id = conn.id(),
                code = e.code(),
                error = %e,
                "no listener was found for event"
            );
            return DispatchOutcome::NoListener;
        };

        match AssertUnwindSafe(handler.handle(payload, conn.clone()))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => DispatchOutcome::Handled,
            Ok(Err(e)) => {
                tracing::error!(
                    conn_id = conn.id(),
                    event = %event,
                    code = e.code(),
                    error = %e,
                    "listener failed"
                );
                DispatchOutcome::HandlerFailed
            }
            Err(_) => {
                tracing::error!(conn_id = conn.id(), event = %event, "listener panicked");
                DispatchOutcome::HandlerFailed
            }
        }
    }

    /// Parse and route one raw text message received on `conn`.
    pub async fn handle_message(&self, conn: &Connection, raw: &str) -> MessageOutcome {
        if conn.state() != ConnState::Open {
            tracing::debug!(
                conn_id = conn.id(),
                state = ?conn.state(),
                "message on non-open connection ignored"
            );
            return MessageOutcome::Ignored;
        }

        let msg_no = conn.next_message_no();
        tracing::debug!(conn_id = conn.id(), msg_no, message = %raw, "received message");

        match parse(raw) {
            Ok(Frame { event, payload }) => {
                let outcome = self.dispatch(&event, payload, conn).await;
                if outcome == DispatchOutcome::Handled {
                    tracing::info!(conn_id = conn.id(), msg_no, event = %event, "triggered event");
                }
                MessageOutcome::Dispatched(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    conn_id = conn.id(),
                    msg_no,
                    code = e.code(),
                    error = %e,
                    "dropped message due to improper format"
                );
                MessageOutcome::Dropped(e)
            }
        }
    }

    // --------------------
    // Outbound
    // --------------------

    /// Emit to every live connection without waiting (serialize once, send N times).
    /// Returns how many connections accepted the message.
    pub fn broadcast<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<usize> {
        let payload = to_payload(payload)?;
        let raw = encode(event, &payload);

        let mut sent = 0;
        for conn in self.connections.snapshot() {
            match conn.try_send_raw(raw.clone()) {
                Ok(()) => sent += 1,
                Err(e) => tracing::debug!(
                    conn_id = conn.id(),
                    code = e.code(),
                    "broadcast skipped connection"
                ),
            }
        }
        Ok(sent)
    }
}
