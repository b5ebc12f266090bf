//! WebSocket session handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS, capturing the optional url param
//! - Open/close the connection in the event router
//! - Feed text frames to the router one at a time (per-connection order)
//! - Writer task: outbound queue, pongs, heartbeat pings
//! - Idle timeout
//! - Shutdown: flush queued output, then send Close

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, Path, State},
    response::Response,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::app_state::AppState;
use crate::dispatch::EventRouter;
use crate::realtime::Connection;
use crate::transport::codec::{decode, Inbound};

const CONTROL_QUEUE: usize = 16;
/// How long the writer gets to flush and send Close once the session ends.
const WRITER_GRACE: Duration = Duration::from_secs(2);

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    upgrade(app, ws, String::new())
}

pub async fn ws_upgrade_with_param(
    State(app): State<AppState>,
    Path(param): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    upgrade(app, ws, param)
}

fn upgrade(app: AppState, ws: WebSocketUpgrade, url_param: String) -> Response {
    ws.on_upgrade(move |socket| run_session(app, url_param, socket))
}

// --------------------
// Session
// --------------------
async fn run_session(app: AppState, url_param: String, socket: WebSocket) {
    let gw = &app.cfg().gateway;
    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);
    let max_message_bytes = gw.max_message_bytes;

    let (out_tx, out_rx) = mpsc::channel::<String>(gw.outbound_queue);
    let (ctrl_tx, ctrl_rx) = mpsc::channel::<Message>(CONTROL_QUEUE);
    let (ws_tx, ws_rx) = socket.split();

    let router = app.router();
    let conn = router.open_connection(out_tx, url_param);
    let span = tracing::info_span!("session", conn_id = conn.id());

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let writer = tokio::spawn(
        write_loop(ws_tx, out_rx, ctrl_rx, shutdown_rx, ping_every).instrument(span.clone()),
    );
    let writer_abort = writer.abort_handle();

    read_loop(&router, &conn, ws_rx, ctrl_tx, idle_timeout, max_message_bytes)
        .instrument(span.clone())
        .await;

    // Closed first: no new emits are accepted while the writer drains.
    router.close_connection(&conn);
    let _ = shutdown_tx.send(());
    if tokio::time::timeout(WRITER_GRACE, writer).await.is_err() {
        span.in_scope(|| tracing::warn!("writer did not finish in time, aborting"));
        writer_abort.abort();
    }
}

async fn read_loop(
    router: &Arc<EventRouter>,
    conn: &Connection,
    mut ws_rx: SplitStream<WebSocket>,
    ctrl_tx: mpsc::Sender<Message>,
    idle_timeout: Duration,
    max_message_bytes: usize,
) {
    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let msg = match incoming {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = %e, "socket read failed");
                        break;
                    }
                };
                last_activity = Instant::now();

                match decode(msg, max_message_bytes) {
                    // awaited inline: message N+1 is not read until N is dispatched
                    Inbound::Text(raw) => {
                        router.handle_message(conn, &raw).await;
                    }
                    Inbound::Oversized { bytes_len } => {
                        tracing::warn!(bytes_len, max_message_bytes, "dropped oversized message");
                    }
                    Inbound::Binary { bytes_len } => {
                        tracing::debug!(bytes_len, "dropped binary frame");
                    }
                    Inbound::Ping(payload) => {
                        let _ = ctrl_tx.try_send(Message::Pong(payload));
                    }
                    Inbound::Pong => {}
                    Inbound::Close => break,
                }
            }

            _ = tokio::time::sleep_until(last_activity + idle_timeout) => {
                tracing::info!("idle timeout");
                break;
            }
        }
    }
}

async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut out_rx: mpsc::Receiver<String>,
    mut ctrl_rx: mpsc::Receiver<Message>,
    mut shutdown: oneshot::Receiver<()>,
    ping_every: Duration,
) {
    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let msg = tokio::select! {
            // dropped sender counts as shutdown too
            _ = &mut shutdown => break,
            Some(text) = out_rx.recv() => Message::Text(text),
            Some(ctrl) = ctrl_rx.recv() => ctrl,
            _ = ping_tick.tick() => Message::Ping(Vec::new()),
        };

        if ws_tx.send(msg).await.is_err() {
            tracing::debug!("socket write failed");
            return;
        }
    }

    while let Ok(text) = out_rx.try_recv() {
        if ws_tx.send(Message::Text(text)).await.is_err() {
            tracing::debug!("socket write failed while draining");
            return;
        }
    }
    // Fails harmlessly if the peer already completed the closing handshake.
    let _ = ws_tx.send(Message::Close(None)).await;
    let _ = ws_tx.close().await;
}
