//! Listener + graceful shutdown.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use eventsocket_core::error::{EventSocketError, Result};

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::dispatch::EventRouter;
use crate::router::build_router;

/// Bind `gateway.listen` and serve until Ctrl+C / SIGTERM.
pub async fn serve(cfg: GatewayConfig, router: Arc<EventRouter>) -> Result<()> {
    let listen = cfg.gateway.listen_addr()?;
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| EventSocketError::Internal(format!("failed to bind {listen}: {e}")))?;
    serve_with_listener(listener, cfg, router, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// The config is validated first; an invalid one is refused before serving.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    cfg: GatewayConfig,
    router: Arc<EventRouter>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    cfg.validate()?;
    let path = cfg.gateway.path.clone();
    let app = build_router(AppState::new(cfg, router));

    match listener.local_addr() {
        Ok(addr) => tracing::info!(%addr, %path, "eventsocket gateway listening"),
        Err(e) => tracing::warn!(error = %e, "listener has no local address"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| EventSocketError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
