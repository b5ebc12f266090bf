use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};

use eventsocket_core::error::{EventSocketError, Result};
use eventsocket_core::protocol::frame::{encode, to_payload};

/// Router-issued connection id. Starts at 0, never reused.
pub type ConnectionId = u64;

/// Connection lifecycle. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Created,
    Open,
    Closed,
}

impl ConnState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ConnState::Created,
            1 => ConnState::Open,
            _ => ConnState::Closed,
        }
    }
}

#[derive(Debug)]
struct ConnectionInner {
    id: ConnectionId,
    url_param: String,
    state: AtomicU8,
    received: AtomicU64,
    tx: mpsc::Sender<String>,
}

/// Cheap, cloneable handle to one websocket connection.
///
/// Outbound text goes into a bounded queue drained by the transport's writer.
#[derive(Debug, Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, url_param: String, tx: mpsc::Sender<String>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                id,
                url_param,
                state: AtomicU8::new(ConnState::Created as u8),
                received: AtomicU64::new(0),
                tx,
            }),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    /// Path segment captured at upgrade time (empty when the route had none).
    pub fn url_param(&self) -> &str {
        &self.inner.url_param
    }

    pub fn state(&self) -> ConnState {
        ConnState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnState::Open
    }

    /// Number of messages received while open (diagnostics only).
    pub fn received(&self) -> u64 {
        self.inner.received.load(Ordering::Relaxed)
    }

    /// Created -> Open. Returns false if the connection was not in `Created`.
    pub(crate) fn mark_open(&self) -> bool {
        self.inner
            .state
            .compare_exchange(
                ConnState::Created as u8,
                ConnState::Open as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Any -> Closed. Returns the state it left.
    pub(crate) fn mark_closed(&self) -> ConnState {
        ConnState::from_u8(self.inner.state.swap(ConnState::Closed as u8, Ordering::AcqRel))
    }

    /// Returns the sequence number of this message and bumps the counter.
    pub(crate) fn next_message_no(&self) -> u64 {
        self.inner.received.fetch_add(1, Ordering::Relaxed)
    }

    /// Encode and queue `event` + `payload`, waiting for queue capacity.
    pub async fn emit<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<()> {
        let raw = self.prepare(event, payload)?;
        self.inner
            .tx
            .send(raw)
            .await
            .map_err(|_| EventSocketError::ConnectionClosed(self.id()))
    }

    /// Like [`emit`](Self::emit) but fails instead of waiting when the queue is full.
    pub fn try_emit<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<()> {
        let raw = self.prepare(event, payload)?;
        self.try_send_raw(raw)
    }

    /// Queue already-encoded wire text (broadcast path: encode once, send N times).
    pub(crate) fn try_send_raw(&self, raw: String) -> Result<()> {
        if self.state() == ConnState::Closed {
            return Err(EventSocketError::ConnectionClosed(self.id()));
        }
        self.inner.tx.try_send(raw).map_err(|e| match e {
            TrySendError::Full(_) => {
                EventSocketError::Internal(format!("outbound queue full (conn #{})", self.id()))
            }
            TrySendError::Closed(_) => EventSocketError::ConnectionClosed(self.id()),
        })
    }

    fn prepare<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> Result<String> {
        if self.state() == ConnState::Closed {
            return Err(EventSocketError::ConnectionClosed(self.id()));
        }
        let payload = to_payload(payload)?;
        Ok(encode(event, &payload))
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Connection {}
