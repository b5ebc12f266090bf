use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use eventsocket_core::error::Result;

use crate::realtime::Connection;

/// Application code invoked with `(payload, connection)` when its event fires.
///
/// Any `Fn(Value, Connection) -> impl Future<Output = Result<()>>` closure is a
/// handler, so most listeners never name this trait.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: Value, conn: Connection) -> Result<()>;
}

/// A handler that knows which event it serves.
///
/// Registered with [`EventRouter::register_listener_by_self_name`].
///
/// [`EventRouter::register_listener_by_self_name`]: crate::dispatch::EventRouter::register_listener_by_self_name
pub trait NamedEventHandler: EventHandler {
    fn event(&self) -> &'static str;
}

#[async_trait]
impl<F, Fut> EventHandler for F
where
    F: Fn(Value, Connection) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(&self, payload: Value, conn: Connection) -> Result<()> {
        (self)(payload, conn).await
    }
}

/// Pin a closure's signature so its argument and output types are inferred.
///
/// ```ignore
/// router.register_listener("ping", handler_fn(|payload, conn| async move {
///     conn.emit("pong", &payload).await
/// }))?;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> F
where
    F: Fn(Value, Connection) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    f
}
